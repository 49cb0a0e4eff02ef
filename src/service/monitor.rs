use crate::geo::Coordinate;
use crate::geofence::{self, Evaluation};
use crate::store::reference::ReferencePointStore;
use crate::tracker::{TrackerEvent, TrackerSubscription};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[derive(Default)]
struct WatchState {
    latest: Option<Coordinate>,
    failed: bool,
}

/// Owns the process-wide tracker subscription and folds its events into
/// the latest-known position. Snapshots re-evaluate against the current
/// reference point, so an admin moving the fence takes effect on the very
/// next read. Dropping the monitor releases the subscription.
pub struct GeofenceMonitor {
    state: Arc<Mutex<WatchState>>,
    reference: Arc<ReferencePointStore>,
    radius_m: f64,
    task: JoinHandle<()>,
}

impl GeofenceMonitor {
    pub fn start(
        mut subscription: TrackerSubscription,
        reference: Arc<ReferencePointStore>,
        radius_m: f64,
    ) -> Self {
        let state = Arc::new(Mutex::new(WatchState::default()));
        let task_state = state.clone();
        let task = tokio::spawn(async move {
            while let Some(event) = subscription.next_event().await {
                let mut s = task_state.lock().unwrap_or_else(|e| e.into_inner());
                match event {
                    TrackerEvent::Fix(coord) => {
                        debug!(
                            latitude = coord.latitude,
                            longitude = coord.longitude,
                            "position updated"
                        );
                        s.latest = Some(coord);
                    }
                    TrackerEvent::Failed(err) => {
                        warn!(error = %err, "positioning failed");
                        s.failed = true;
                        break;
                    }
                }
            }
        });
        Self {
            state,
            reference,
            radius_m,
            task,
        }
    }

    fn lock(&self) -> MutexGuard<'_, WatchState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Current geofence evaluation, recomputed on every call.
    pub fn snapshot(&self) -> Evaluation {
        let s = self.lock();
        if s.failed {
            return Evaluation::error();
        }
        geofence::evaluate(s.latest, self.reference.get(), self.radius_m)
    }

    /// Latest fresh fix, if any was ever received.
    pub fn latest_fix(&self) -> Option<Coordinate> {
        self.lock().latest
    }

    pub fn radius_m(&self) -> f64 {
        self.radius_m
    }
}

impl Drop for GeofenceMonitor {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geofence::GeofenceStatus;
    use crate::storage::{SlotFile, test_support::ScratchDir};
    use crate::tracker::{LocationTracker, PositionError, PositionSource, reported_fix_feed};
    use futures::future::BoxFuture;
    use std::time::Duration;

    const REFERENCE: Coordinate = Coordinate {
        latitude: 39.9042,
        longitude: 116.4074,
    };

    fn reference_store(scratch: &ScratchDir) -> Arc<ReferencePointStore> {
        Arc::new(
            ReferencePointStore::open(SlotFile::new(&scratch.0, "reference.json"), REFERENCE)
                .unwrap(),
        )
    }

    async fn wait_for<F: Fn(&GeofenceMonitor) -> bool>(monitor: &GeofenceMonitor, cond: F) {
        for _ in 0..100 {
            if cond(monitor) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("condition not reached, status = {:?}", monitor.snapshot());
    }

    #[tokio::test]
    async fn starts_locating_then_follows_fixes() {
        let scratch = ScratchDir::new();
        let (tx, source) = reported_fix_feed(8);
        let sub = LocationTracker::start(source, Duration::from_secs(10));
        let monitor = GeofenceMonitor::start(sub, reference_store(&scratch), 100.0);

        assert_eq!(monitor.snapshot().status, GeofenceStatus::Locating);

        tx.send(Coordinate::new(39.9043, 116.4075)).await.unwrap();
        wait_for(&monitor, |m| {
            m.snapshot().status == GeofenceStatus::InRange
        })
        .await;
        let eval = monitor.snapshot();
        assert!((eval.distance_m - 13.0).abs() < 2.0);

        // Walk out of range: the very next evaluation flips.
        tx.send(Coordinate::new(39.9142, 116.4074)).await.unwrap();
        wait_for(&monitor, |m| {
            m.snapshot().status == GeofenceStatus::OutOfRange
        })
        .await;
    }

    #[tokio::test]
    async fn failure_before_any_fix_goes_locating_to_error() {
        struct FailingSource;
        impl PositionSource for FailingSource {
            fn next_fix(&mut self) -> BoxFuture<'_, Result<Coordinate, PositionError>> {
                Box::pin(async { Err(PositionError::Unsupported) })
            }
        }

        let scratch = ScratchDir::new();
        let sub = LocationTracker::start(FailingSource, Duration::from_secs(10));
        let monitor = GeofenceMonitor::start(sub, reference_store(&scratch), 100.0);

        wait_for(&monitor, |m| {
            m.snapshot().status == GeofenceStatus::Error
        })
        .await;
        assert!(!monitor.snapshot().can_check_in());
    }

    #[tokio::test]
    async fn moving_the_reference_point_applies_on_the_next_read() {
        let scratch = ScratchDir::new();
        let reference = reference_store(&scratch);
        let (tx, source) = reported_fix_feed(8);
        let sub = LocationTracker::start(source, Duration::from_secs(10));
        let monitor = GeofenceMonitor::start(sub, reference.clone(), 100.0);

        tx.send(REFERENCE).await.unwrap();
        wait_for(&monitor, |m| {
            m.snapshot().status == GeofenceStatus::InRange
        })
        .await;

        // Admin moves the fence far away; no new fix needed.
        reference.set(Coordinate::new(31.2304, 121.4737)).unwrap();
        assert_eq!(monitor.snapshot().status, GeofenceStatus::OutOfRange);
    }
}
