use crate::error::Error;
use crate::model::record::CheckInRecord;
use crate::service::message::MessageClient;
use crate::service::monitor::GeofenceMonitor;
use crate::store::ledger::AttendanceLedger;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

/// Releases the in-flight flag on every exit path.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Orchestrates one check-in: gate check, double-submission guard,
/// message fetch with fallback, durable ledger append.
pub struct CheckInService {
    ledger: Arc<AttendanceLedger>,
    monitor: Arc<GeofenceMonitor>,
    messages: MessageClient,
    in_flight: AtomicBool,
}

impl CheckInService {
    pub fn new(
        ledger: Arc<AttendanceLedger>,
        monitor: Arc<GeofenceMonitor>,
        messages: MessageClient,
    ) -> Self {
        Self {
            ledger,
            monitor,
            messages,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Performs the check-in for `user_name`. Exactly one record is
    /// created per successful call; a second call while one is in flight
    /// is rejected rather than queued.
    pub async fn check_in(&self, user_name: &str) -> Result<CheckInRecord, Error> {
        let eval = self.monitor.snapshot();
        if !eval.can_check_in() {
            return Err(Error::NotInRange(eval.status));
        }
        let location = self
            .monitor
            .latest_fix()
            .ok_or(Error::NotInRange(eval.status))?;

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(Error::CheckInInFlight);
        }
        let _guard = InFlightGuard(&self.in_flight);

        let message = self.messages.fetch_message().await;
        let record = CheckInRecord::new(user_name.to_string(), location, Some(message));
        self.ledger.append(record.clone())?;

        info!(
            user = user_name,
            record_id = %record.id,
            distance_m = eval.distance_m,
            "check-in recorded"
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinate;
    use crate::geofence::GeofenceStatus;
    use crate::storage::{SlotFile, test_support::ScratchDir};
    use crate::store::reference::ReferencePointStore;
    use crate::tracker::{LocationTracker, reported_fix_feed};
    use std::time::Duration;

    const REFERENCE: Coordinate = Coordinate {
        latitude: 39.9042,
        longitude: 116.4074,
    };

    struct Fixture {
        service: CheckInService,
        ledger: Arc<AttendanceLedger>,
        fix_tx: tokio::sync::mpsc::Sender<Coordinate>,
        _scratch: ScratchDir,
    }

    fn fixture() -> Fixture {
        let scratch = ScratchDir::new();
        let ledger = Arc::new(
            AttendanceLedger::open(SlotFile::new(&scratch.0, "ledger.json")).unwrap(),
        );
        let reference = Arc::new(
            ReferencePointStore::open(SlotFile::new(&scratch.0, "reference.json"), REFERENCE)
                .unwrap(),
        );
        let (fix_tx, source) = reported_fix_feed(8);
        let sub = LocationTracker::start(source, Duration::from_secs(10));
        let monitor = Arc::new(GeofenceMonitor::start(sub, reference, 100.0));
        let service = CheckInService::new(ledger.clone(), monitor, MessageClient::disabled());
        Fixture {
            service,
            ledger,
            fix_tx,
            _scratch: scratch,
        }
    }

    async fn locate(fixture: &Fixture, coord: Coordinate) {
        fixture.fix_tx.send(coord).await.unwrap();
        for _ in 0..100 {
            if fixture.service.monitor.latest_fix() == Some(coord) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("fix never observed");
    }

    #[tokio::test]
    async fn in_range_check_in_appends_one_record() {
        let fixture = fixture();
        locate(&fixture, Coordinate::new(39.9043, 116.4075)).await;

        let record = fixture.service.check_in("Alice").await.unwrap();
        assert_eq!(record.user_name, "Alice");
        assert_eq!(
            record.message.as_deref(),
            Some(crate::service::message::DEFAULT_CHECK_IN_MESSAGE)
        );

        let mine = fixture.ledger.records_for_user("Alice");
        assert_eq!(mine, vec![record]);
    }

    #[tokio::test]
    async fn check_in_is_refused_before_any_fix() {
        let fixture = fixture();
        let err = fixture.service.check_in("Alice").await.unwrap_err();
        assert!(matches!(err, Error::NotInRange(GeofenceStatus::Locating)));
        assert!(fixture.ledger.records_for_user("Alice").is_empty());
    }

    #[tokio::test]
    async fn check_in_is_refused_out_of_range() {
        let fixture = fixture();
        locate(&fixture, Coordinate::new(39.9142, 116.4074)).await;

        let err = fixture.service.check_in("Alice").await.unwrap_err();
        assert!(matches!(
            err,
            Error::NotInRange(GeofenceStatus::OutOfRange)
        ));
        assert!(fixture.ledger.records_for_user("Alice").is_empty());
    }

    #[tokio::test]
    async fn second_submission_while_in_flight_is_rejected() {
        let fixture = fixture();
        locate(&fixture, REFERENCE).await;

        // Simulate an in-flight check-in holding the guard.
        fixture.service.in_flight.store(true, Ordering::SeqCst);
        let err = fixture.service.check_in("Alice").await.unwrap_err();
        assert!(matches!(err, Error::CheckInInFlight));

        // Once the first submission finishes, check-in works again.
        fixture.service.in_flight.store(false, Ordering::SeqCst);
        fixture.service.check_in("Alice").await.unwrap();
    }
}
