use crate::error::Error;
use crate::geo::Coordinate;
use crate::storage::SlotFile;
use anyhow::Result;
use std::sync::{Mutex, MutexGuard};
use tracing::info;

/// Singleton geofence center. Falls back to a hardcoded coordinate until
/// an administrator sets one; updates take effect on the next evaluation.
pub struct ReferencePointStore {
    slot: SlotFile,
    current: Mutex<Option<Coordinate>>,
    fallback: Coordinate,
}

impl ReferencePointStore {
    pub fn open(slot: SlotFile, fallback: Coordinate) -> Result<Self> {
        let current = slot.load::<Coordinate>()?;
        Ok(Self {
            slot,
            current: Mutex::new(current),
            fallback,
        })
    }

    fn lock(&self) -> MutexGuard<'_, Option<Coordinate>> {
        self.current.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn get(&self) -> Coordinate {
        self.lock().unwrap_or(self.fallback)
    }

    pub fn set(&self, coord: Coordinate) -> Result<(), Error> {
        let mut current = self.lock();
        self.slot
            .store(&coord)
            .map_err(|cause| Error::persistence("reference location", cause))?;
        *current = Some(coord);
        info!(
            latitude = coord.latitude,
            longitude = coord.longitude,
            "reference point updated"
        );
        Ok(())
    }
}
