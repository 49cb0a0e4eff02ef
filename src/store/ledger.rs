use crate::error::Error;
use crate::model::record::CheckInRecord;
use crate::storage::SlotFile;
use anyhow::Result;
use chrono::{Local, NaiveDate};
use std::sync::{Mutex, MutexGuard};

/// Append-only record store, newest first. Every append persists the full
/// updated ledger before the in-memory copy is touched.
pub struct AttendanceLedger {
    slot: SlotFile,
    records: Mutex<Vec<CheckInRecord>>,
}

impl AttendanceLedger {
    pub fn open(slot: SlotFile) -> Result<Self> {
        let records = slot.load::<Vec<CheckInRecord>>()?.unwrap_or_default();
        Ok(Self {
            slot,
            records: Mutex::new(records),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Vec<CheckInRecord>> {
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Inserts at the head. Uniqueness of (user, day) is deliberately not
    /// enforced; a user may check in any number of times per day.
    pub fn append(&self, record: CheckInRecord) -> Result<(), Error> {
        let mut records = self.lock();
        let mut next = Vec::with_capacity(records.len() + 1);
        next.push(record);
        next.extend(records.iter().cloned());

        self.slot
            .store(&next)
            .map_err(|cause| Error::persistence("ledger", cause))?;
        *records = next;
        Ok(())
    }

    /// All records for `name`, newest first.
    pub fn records_for_user(&self, name: &str) -> Vec<CheckInRecord> {
        self.lock()
            .iter()
            .filter(|r| r.user_name == name)
            .cloned()
            .collect()
    }

    /// All records whose timestamp falls on `day` (local time), any user.
    pub fn records_for_day(&self, day: NaiveDate) -> Vec<CheckInRecord> {
        self.lock()
            .iter()
            .filter(|r| r.local_day() == Some(day))
            .cloned()
            .collect()
    }

    /// Today's roster: one record per user, retaining whichever record a
    /// single forward pass over the newest-first sequence meets first.
    /// That is each user's most recent check-in of the day, in the order
    /// the scan found them. Intentionally not "earliest timestamp".
    pub fn first_per_user_today(&self) -> Vec<CheckInRecord> {
        let today = Local::now().date_naive();
        let mut seen: Vec<CheckInRecord> = Vec::new();
        for record in self.lock().iter() {
            if record.local_day() != Some(today) {
                continue;
            }
            if seen.iter().any(|r| r.user_name == record.user_name) {
                continue;
            }
            seen.push(record.clone());
        }
        seen
    }
}
