//! Snapshot cache - serves the most recent snapshot to both front ends.
//!
//! The HTTP handlers and the bot loop read from here, never from the
//! sources directly, so a burst of requests costs at most one refresh per
//! interval.

use minewatch_common::StatusSnapshot;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

/// Anything that can produce a fresh snapshot. Infallible: source failures
/// are already degraded to defaults inside the refresh.
pub trait Refresh {
    fn refresh(&self) -> impl std::future::Future<Output = StatusSnapshot> + Send;
}

pub struct SnapshotCache<R> {
    refresher: R,
    max_age: Duration,
    slot: Mutex<Option<(Arc<StatusSnapshot>, Instant)>>,
}

impl<R: Refresh> SnapshotCache<R> {
    pub fn new(refresher: R, max_age: Duration) -> Self {
        Self {
            refresher,
            max_age,
            slot: Mutex::new(None),
        }
    }

    /// Return the current snapshot, refreshing only when the cached one has
    /// aged past the configured interval.
    ///
    /// The slot lock is held across the refresh, so at most one refresh is
    /// ever in flight; concurrent callers block briefly on it and then
    /// observe the freshly cached snapshot. The very first call always
    /// performs a refresh - there is nothing older to serve.
    pub async fn get(&self) -> Arc<StatusSnapshot> {
        let mut slot = self.slot.lock().await;

        if let Some((snapshot, taken_at)) = slot.as_ref() {
            if taken_at.elapsed() < self.max_age {
                return Arc::clone(snapshot);
            }
            debug!("Cached snapshot expired, refreshing");
        }

        let snapshot = Arc::new(self.refresher.refresh().await);
        *slot = Some((Arc::clone(&snapshot), Instant::now()));
        snapshot
    }
}
