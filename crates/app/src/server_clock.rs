//! Server clock — a locally ticked copy of the device's epoch.
//!
//! The status-only page shows the device's own clock without polling: the
//! epoch from the last snapshot is cached and incremented once per second
//! by a background task, independent of the network.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

use irispanel_domain::time::{EpochSeconds, format_local};

/// Ticking copy of the device clock.
#[derive(Debug, Default)]
pub struct ServerClock {
    epoch: Arc<AtomicI64>,
    ticker: Mutex<Option<JoinHandle<()>>>,
}

impl ServerClock {
    /// Create a stopped clock reading epoch `0`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the clock with the device-reported epoch and (re)start the
    /// once-per-second tick. A previous ticker is superseded.
    pub fn start(&self, initial: EpochSeconds) {
        self.epoch.store(initial, Ordering::SeqCst);

        let epoch = Arc::clone(&self.epoch);
        let ticker = tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_secs(1)).await;
                epoch.fetch_add(1, Ordering::SeqCst);
            }
        });

        let mut slot = self.ticker.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = slot.replace(ticker) {
            previous.abort();
        }
    }

    /// Stop ticking; the epoch freezes at its current value.
    pub fn stop(&self) {
        let mut slot = self.ticker.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(ticker) = slot.take() {
            ticker.abort();
        }
    }

    /// Whether the clock is currently ticking.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.ticker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|t| !t.is_finished())
    }

    /// Current epoch value.
    #[must_use]
    pub fn now(&self) -> EpochSeconds {
        self.epoch.load(Ordering::SeqCst)
    }

    /// Current value rendered as a local date-time.
    #[must_use]
    pub fn display(&self) -> String {
        format_local(self.now())
    }
}

impl Drop for ServerClock {
    fn drop(&mut self) {
        self.stop();
    }
}
