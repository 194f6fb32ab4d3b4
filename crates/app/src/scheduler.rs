//! Schedule timers — one cancellable countdown per gate.
//!
//! A timer converts an absolute epoch target into a relative delay and runs
//! a deferred action when it elapses. Each gate owns at most one live timer:
//! arming replaces (and aborts) the previous one, and cancelling aborts it
//! outright. A target that is not strictly in the future never arms — it is
//! logged and skipped, not fired immediately.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

use irispanel_domain::gate::GateId;
use irispanel_domain::time::{EpochSeconds, now_epoch};

/// Per-gate one-shot timers with last-writer-wins semantics.
#[derive(Debug, Default)]
pub struct ScheduleTimers {
    timers: Mutex<HashMap<GateId, JoinHandle<()>>>,
}

impl ScheduleTimers {
    /// Create an empty timer table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a countdown for `gate` that runs `on_elapsed` when `target`
    /// (epoch seconds) is reached.
    ///
    /// Returns `false` without arming when `target` is now or in the past;
    /// a previously armed timer for the gate is left untouched in that case.
    /// Otherwise any previous timer for the gate is aborted first and the
    /// new one is armed.
    pub fn arm<F>(&self, gate: GateId, target: EpochSeconds, on_elapsed: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = target - now_epoch();
        if delay <= 0 {
            tracing::info!(gate = %gate, target, "schedule already elapsed, not arming");
            return false;
        }
        let delay = delay.unsigned_abs();

        tracing::info!(gate = %gate, seconds = delay, "schedule armed");
        let handle = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(delay)).await;
            tracing::info!(gate = %gate, "schedule elapsed");
            on_elapsed.await;
        });

        let mut timers = self.lock();
        if let Some(previous) = timers.insert(gate, handle) {
            previous.abort();
        }
        true
    }

    /// Cancel the timer for `gate`, if any. Returns whether a live timer
    /// was actually aborted.
    pub fn cancel(&self, gate: GateId) -> bool {
        match self.lock().remove(&gate) {
            Some(handle) => {
                let was_live = !handle.is_finished();
                handle.abort();
                if was_live {
                    tracing::info!(gate = %gate, "schedule timer cancelled");
                }
                was_live
            }
            None => false,
        }
    }

    /// Whether `gate` currently has a live (not yet elapsed) timer.
    #[must_use]
    pub fn is_armed(&self, gate: GateId) -> bool {
        self.lock().get(&gate).is_some_and(|h| !h.is_finished())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<GateId, JoinHandle<()>>> {
        self.timers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for ScheduleTimers {
    fn drop(&mut self) {
        for handle in self.lock().values() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, impl Fn() -> CountFire) {
        let count = Arc::new(AtomicUsize::new(0));
        let cloned = Arc::clone(&count);
        (count, move || CountFire(Arc::clone(&cloned)))
    }

    struct CountFire(Arc<AtomicUsize>);

    impl CountFire {
        async fn fire(self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    async fn settle() {
        // Let spawned timer tasks observe the advanced clock.
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
    }

    #[tokio::test(start_paused = true)]
    async fn should_not_arm_for_past_target() {
        let timers = ScheduleTimers::new();
        let (count, fire) = counter();

        assert!(!timers.arm(GateId::One, now_epoch() - 10, fire().fire()));
        assert!(!timers.is_armed(GateId::One));

        tokio::time::advance(Duration::from_secs(60)).await;
        settle().await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn should_not_arm_for_current_second() {
        let timers = ScheduleTimers::new();
        let (count, fire) = counter();

        assert!(!timers.arm(GateId::One, now_epoch(), fire().fire()));

        tokio::time::advance(Duration::from_secs(60)).await;
        settle().await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn should_fire_exactly_once_when_delay_elapses() {
        let timers = ScheduleTimers::new();
        let (count, fire) = counter();

        assert!(timers.arm(GateId::One, now_epoch() + 5, fire().fire()));
        assert!(timers.is_armed(GateId::One));
        settle().await;

        tokio::time::advance(Duration::from_secs(5)).await;
        settle().await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_secs(600)).await;
        settle().await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!timers.is_armed(GateId::One));
    }

    #[tokio::test(start_paused = true)]
    async fn should_not_fire_before_delay_elapses() {
        let timers = ScheduleTimers::new();
        let (count, fire) = counter();

        assert!(timers.arm(GateId::One, now_epoch() + 30, fire().fire()));

        tokio::time::advance(Duration::from_secs(10)).await;
        settle().await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(timers.is_armed(GateId::One));
    }

    #[tokio::test(start_paused = true)]
    async fn should_supersede_previous_timer_on_rearm() {
        let timers = ScheduleTimers::new();
        let (count, fire) = counter();

        assert!(timers.arm(GateId::One, now_epoch() + 5, fire().fire()));
        assert!(timers.arm(GateId::One, now_epoch() + 120, fire().fire()));

        // The first deadline passes without a fire: the old timer is gone.
        tokio::time::advance(Duration::from_secs(30)).await;
        settle().await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        tokio::time::advance(Duration::from_secs(120)).await;
        settle().await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn should_not_fire_after_cancel() {
        let timers = ScheduleTimers::new();
        let (count, fire) = counter();

        assert!(timers.arm(GateId::Two, now_epoch() + 5, fire().fire()));
        assert!(timers.cancel(GateId::Two));
        assert!(!timers.is_armed(GateId::Two));

        tokio::time::advance(Duration::from_secs(600)).await;
        settle().await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn should_report_nothing_to_cancel() {
        let timers = ScheduleTimers::new();
        assert!(!timers.cancel(GateId::One));
    }

    #[tokio::test(start_paused = true)]
    async fn should_keep_gates_independent() {
        let timers = ScheduleTimers::new();
        let (count_1, fire_1) = counter();
        let (count_2, fire_2) = counter();

        assert!(timers.arm(GateId::One, now_epoch() + 5, fire_1().fire()));
        assert!(timers.arm(GateId::Two, now_epoch() + 60, fire_2().fire()));
        timers.cancel(GateId::One);
        settle().await;

        tokio::time::advance(Duration::from_secs(120)).await;
        settle().await;
        assert_eq!(count_1.load(Ordering::SeqCst), 0);
        assert_eq!(count_2.load(Ordering::SeqCst), 1);
    }
}
