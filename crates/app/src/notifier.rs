//! Notifier — transient banner state with auto-dismiss.
//!
//! The banner holds at most one notification. Posting replaces the current
//! one, aborts any pending dismissal, and schedules a fresh auto-clear.
//! Subscribers observe the banner through a watch channel: `Some` while a
//! notification is showing, `None` once dismissed.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use irispanel_domain::notification::Notification;

/// How long a notification stays visible before auto-dismissal.
pub const DISMISS_AFTER: Duration = Duration::from_secs(4);

/// Shared banner state. Cheap to clone; clones observe the same banner.
#[derive(Debug, Clone)]
pub struct Notifier {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    current: watch::Sender<Option<Notification>>,
    dismissal: Mutex<Option<JoinHandle<()>>>,
}

impl Default for Notifier {
    fn default() -> Self {
        let (current, _) = watch::channel(None);
        Self {
            inner: Arc::new(Inner {
                current,
                dismissal: Mutex::new(None),
            }),
        }
    }
}

impl Notifier {
    /// Create a notifier with no visible banner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a notification, superseding any currently visible one and its
    /// pending dismissal.
    pub fn post(&self, notification: Notification) {
        tracing::debug!(kind = %notification.kind, message = %notification.message, "notification posted");
        self.inner.current.send_replace(Some(notification));

        let inner = Arc::clone(&self.inner);
        let dismiss = tokio::spawn(async move {
            tokio::time::sleep(DISMISS_AFTER).await;
            inner.current.send_replace(None);
        });

        let mut slot = self
            .inner
            .dismissal
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = slot.replace(dismiss) {
            previous.abort();
        }
    }

    /// Convenience wrapper for [`Notification::success`].
    pub fn success(&self, message: impl Into<String>) {
        self.post(Notification::success(message));
    }

    /// Convenience wrapper for [`Notification::error`].
    pub fn error(&self, message: impl Into<String>) {
        self.post(Notification::error(message));
    }

    /// Subscribe to banner changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Notification>> {
        self.inner.current.subscribe()
    }

    /// The currently visible notification, if any.
    #[must_use]
    pub fn current(&self) -> Option<Notification> {
        self.inner.current.borrow().clone()
    }
}
