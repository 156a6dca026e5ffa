// ── Cache-warming poller ──
//
// Optional alternative to purely on-demand reads: a background task
// re-reads the device on a fixed interval so host getters usually hit a
// warm cache, and publishes each result on a watch channel.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, warn};

use canary_api::Reading;

use crate::resolver::SensorResolver;

/// Readings captured by one poll.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadingsSnapshot {
    pub readings: Vec<Reading>,
    pub fetched_at: DateTime<Utc>,
}

impl ReadingsSnapshot {
    pub fn value(&self, sensor_type: &str) -> Option<f64> {
        self.readings
            .iter()
            .find(|r| r.sensor_type == sensor_type)
            .map(|r| r.value)
    }
}

pub type SnapshotReceiver = watch::Receiver<Option<Arc<ReadingsSnapshot>>>;

/// Handle to a running poll task. Dropping it cancels the task; call
/// [`shutdown`](Self::shutdown) to also wait for it to exit.
pub struct Poller {
    rx: SnapshotReceiver,
    _cancel_on_drop: DropGuard,
    handle: JoinHandle<()>,
}

impl Poller {
    /// Start polling immediately, then every `interval`.
    pub fn spawn(resolver: Arc<SensorResolver>, interval: Duration) -> Self {
        let (tx, rx) = watch::channel(None);
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(poll_task(resolver, interval, tx, cancel.clone()));
        Self {
            rx,
            _cancel_on_drop: cancel.drop_guard(),
            handle,
        }
    }

    pub fn subscribe(&self) -> SnapshotReceiver {
        self.rx.clone()
    }

    /// The most recent successful snapshot, if any.
    pub fn latest(&self) -> Option<Arc<ReadingsSnapshot>> {
        self.rx.borrow().clone()
    }

    /// Stop the task and wait for it to exit.
    pub async fn shutdown(self) {
        let Self {
            _cancel_on_drop: guard,
            handle,
            ..
        } = self;
        drop(guard);
        if let Err(e) = handle.await {
            warn!(error = %e, "poll task ended abnormally");
        }
    }
}

async fn poll_task(
    resolver: Arc<SensorResolver>,
    interval: Duration,
    tx: watch::Sender<Option<Arc<ReadingsSnapshot>>>,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {
                match resolver.readings().await {
                    Ok(readings) => {
                        debug!(serial = resolver.serial(), count = readings.len(), "polled readings");
                        tx.send_replace(Some(Arc::new(ReadingsSnapshot {
                            readings,
                            fetched_at: Utc::now(),
                        })));
                    }
                    Err(e) => {
                        warn!(serial = resolver.serial(), error = %e, "periodic readings refresh failed");
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_lookup_by_sensor_name() {
        let snapshot = ReadingsSnapshot {
            readings: vec![
                Reading {
                    sensor_type: "humidity".into(),
                    value: 41.0,
                    created: None,
                },
                Reading {
                    sensor_type: "battery".into(),
                    value: 77.0,
                    created: None,
                },
            ],
            fetched_at: Utc::now(),
        };

        assert_eq!(snapshot.value("battery"), Some(77.0));
        assert_eq!(snapshot.value("temperature"), None);
    }
}
