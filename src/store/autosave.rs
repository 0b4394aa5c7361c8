//! Periodic autosave task
//!
//! Flushes the player store on a fixed period for the process lifetime. The
//! store itself skips the write when nothing is dirty, so an idle daemon
//! does no disk I/O. On shutdown one final flush runs so a mutation made in
//! the last period is not lost.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::interval;
use tracing::info;

use super::PlayerStore;

/// Periodic flush of a [`PlayerStore`]
pub struct AutosaveScheduler {
    store: Arc<PlayerStore>,
    period: Duration,
}

impl AutosaveScheduler {
    pub fn new(store: Arc<PlayerStore>, period: Duration) -> Self {
        Self { store, period }
    }

    /// Run until `shutdown` is set, then flush once more and exit.
    pub async fn run(self, shutdown: Arc<AtomicBool>) {
        info!(period_ms = self.period.as_millis() as u64, "autosave started");
        let mut timer = interval(self.period);
        // the immediate first tick of `interval`; the first save happens one
        // full period after startup
        timer.tick().await;

        while !shutdown.load(Ordering::SeqCst) {
            timer.tick().await;
            self.store.save();
        }

        self.store.save();
        info!("autosave stopped");
    }
}
