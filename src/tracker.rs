use crate::geo::Coordinate;
use futures::future::BoxFuture;
use futures_util::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, warn};

/// Bounded wait for a single fix before the attempt is considered missed.
pub const DEFAULT_FIX_WAIT: Duration = Duration::from_secs(10);

/// Terminal positioning failures. A missed fix is not one of these; the
/// watch simply keeps waiting for the next update.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    #[error("positioning is not available on this device")]
    Unsupported,
    #[error("positioning permission denied")]
    Denied,
    #[error("position fix failed: {0}")]
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TrackerEvent {
    /// A fresh fix, delivered the moment the source produced it.
    Fix(Coordinate),
    /// Terminal failure; no further events follow.
    Failed(PositionError),
}

/// Something that can produce position fixes, one at a time.
///
/// `next_fix` must be cancel-safe: the tracker drops the in-flight future
/// whenever the per-fix wait elapses and calls again.
pub trait PositionSource: Send + 'static {
    fn next_fix(&mut self) -> BoxFuture<'_, Result<Coordinate, PositionError>>;
}

/// A source fed by fixes the device reports over the API.
pub struct ReportedFixSource {
    rx: mpsc::Receiver<Coordinate>,
}

/// Builds the report side and the source side of the device fix feed.
pub fn reported_fix_feed(capacity: usize) -> (mpsc::Sender<Coordinate>, ReportedFixSource) {
    let (tx, rx) = mpsc::channel(capacity);
    (tx, ReportedFixSource { rx })
}

impl PositionSource for ReportedFixSource {
    fn next_fix(&mut self) -> BoxFuture<'_, Result<Coordinate, PositionError>> {
        Box::pin(async move {
            self.rx
                .recv()
                .await
                .ok_or_else(|| PositionError::Failed("fix feed closed".to_string()))
        })
    }
}

pub struct LocationTracker;

impl LocationTracker {
    /// Starts continuous observation of `source`.
    ///
    /// Each fix attempt waits at most `per_fix_wait`; a timed-out attempt
    /// is skipped and observation continues. A hard source failure emits
    /// one terminal `Failed` event and ends the watch. Dropping (or
    /// stopping) the returned subscription cancels the watch; nothing is
    /// delivered afterwards.
    pub fn start<S: PositionSource>(mut source: S, per_fix_wait: Duration) -> TrackerSubscription {
        let (tx, rx) = mpsc::channel(16);
        let task = tokio::spawn(async move {
            loop {
                match timeout(per_fix_wait, source.next_fix()).await {
                    // Missed fix: stay subscribed, wait for the next one.
                    Err(_elapsed) => {
                        debug!(wait_ms = per_fix_wait.as_millis() as u64, "fix attempt timed out");
                        continue;
                    }
                    Ok(Ok(fix)) => {
                        if tx.send(TrackerEvent::Fix(fix)).await.is_err() {
                            break; // consumer gone
                        }
                    }
                    Ok(Err(err)) => {
                        warn!(error = %err, "position source failed, ending watch");
                        let _ = tx.send(TrackerEvent::Failed(err)).await;
                        break;
                    }
                }
            }
        });
        TrackerSubscription {
            rx,
            task: AbortOnDrop(task),
        }
    }
}

/// Aborts the observation task when the owning handle goes away.
struct AbortOnDrop(JoinHandle<()>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Handle to a running watch. Owns its lifetime: dropping it releases the
/// underlying observation task.
pub struct TrackerSubscription {
    rx: mpsc::Receiver<TrackerEvent>,
    task: AbortOnDrop,
}

impl TrackerSubscription {
    pub async fn next_event(&mut self) -> Option<TrackerEvent> {
        self.rx.recv().await
    }

    /// The lazy, infinite event sequence as a `Stream`.
    pub fn into_stream(self) -> TrackerStream {
        let TrackerSubscription { rx, task } = self;
        TrackerStream {
            inner: ReceiverStream::new(rx),
            _task: task,
        }
    }

    /// Cancels the watch. Re-subscribing later via `LocationTracker::start`
    /// is always safe.
    pub fn stop(self) {}
}

pub struct TrackerStream {
    inner: ReceiverStream<TrackerEvent>,
    _task: AbortOnDrop,
}

impl Stream for TrackerStream {
    type Item = TrackerEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
