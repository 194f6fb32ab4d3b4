//! Panel controller — the single owner of client-side gate state.
//!
//! The controller holds one typed state slot per gate (the rendered page is
//! only ever a reflection of it, never a source of decisions), the timer
//! table, the notification banner, and the optional server clock. It serves
//! both page variants through [`PageMode`] instead of duplicating itself.
//!
//! The device remains the trigger of record for scheduled openings: it opens
//! the gate on its own when a schedule elapses. The local countdown flips the
//! view optimistically and immediately re-fetches the snapshot to reconcile.
//! Failed mutating actions also re-fetch, so the view never silently drifts
//! from the device.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

use irispanel_domain::error::{DeviceError, PanelError};
use irispanel_domain::gate::{GateId, GatePosition};
use irispanel_domain::notification::Notification;
use irispanel_domain::snapshot::InfoSnapshot;
use irispanel_domain::time::{EpochSeconds, format_local, parse_local};

use crate::notifier::Notifier;
use crate::ports::{ConfirmationPrompt, DeviceApi};
use crate::scheduler::ScheduleTimers;
use crate::server_clock::ServerClock;

/// Sentinel shown when a gate has no schedule.
pub const SCHEDULE_NOT_SET: &str = "not set";

/// Which page variant the controller is driving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageMode {
    /// Full panel: gate widgets, schedule form, actions.
    #[default]
    Home,
    /// Read-only status page with a live server-time display.
    StatusOnly,
}

/// Outcome of a toggle request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The user declined the confirmation; nothing was sent.
    Declined,
    /// The gate was toggled to the given position.
    Toggled(GatePosition),
}

/// Read-only view of one gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateView {
    pub id: GateId,
    pub position: GatePosition,
    pub schedule: Option<EpochSeconds>,
    /// Formatted schedule, or [`SCHEDULE_NOT_SET`].
    pub schedule_text: String,
}

/// Read-only view of the whole panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelView {
    /// `false` raises the connectivity warning.
    pub connected: bool,
    pub gates: [GateView; 2],
    /// Ticked device clock, present in [`PageMode::StatusOnly`].
    pub server_time: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
struct GateSlot {
    position: GatePosition,
    schedule: Option<EpochSeconds>,
}

struct PanelInner<A> {
    api: A,
    mode: PageMode,
    gates: Mutex<[GateSlot; 2]>,
    connected: AtomicBool,
    notifier: Notifier,
    timers: ScheduleTimers,
    clock: ServerClock,
}

/// Panel controller. Cheap to clone; clones share the same state.
pub struct PanelController<A> {
    inner: Arc<PanelInner<A>>,
}

impl<A> Clone for PanelController<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A> PanelInner<A> {
    fn lock_gates(&self) -> MutexGuard<'_, [GateSlot; 2]> {
        self.gates.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn slot(&self, gate: GateId) -> GateSlot {
        self.lock_gates()[gate.index()]
    }

    fn set_position(&self, gate: GateId, position: GatePosition) {
        self.lock_gates()[gate.index()].position = position;
    }

    fn set_schedule_slot(&self, gate: GateId, schedule: Option<EpochSeconds>) {
        self.lock_gates()[gate.index()].schedule = schedule;
    }

    /// Overwrite positions, schedules, and connectivity from a snapshot
    /// without touching the timer table.
    fn store_reported(&self, snapshot: &InfoSnapshot) {
        {
            let mut gates = self.lock_gates();
            for gate in GateId::ALL {
                let report = snapshot.gate(gate);
                gates[gate.index()] = GateSlot {
                    position: report.position(),
                    schedule: report.schedule(),
                };
            }
        }
        self.connected.store(snapshot.is_connected, Ordering::SeqCst);
        if !snapshot.is_connected {
            tracing::warn!("device reports lost connectivity");
        }
    }
}

impl<A: DeviceApi + 'static> PanelController<A> {
    /// Create a controller for the given device and page variant.
    pub fn new(api: A, mode: PageMode) -> Self {
        Self {
            inner: Arc::new(PanelInner {
                api,
                mode,
                gates: Mutex::new([GateSlot::default(); 2]),
                connected: AtomicBool::new(true),
                notifier: Notifier::new(),
                timers: ScheduleTimers::new(),
                clock: ServerClock::new(),
            }),
        }
    }

    /// Fetch the snapshot, adopt it as the current state, and arm countdowns
    /// for future schedules. Past schedules are logged and left alone.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::Device`] when the snapshot request fails; the
    /// failure is also posted to the banner.
    pub async fn load(&self) -> Result<PanelView, PanelError> {
        match self.inner.api.fetch_info().await {
            Ok(snapshot) => {
                self.apply_snapshot(&snapshot);
                Ok(self.view())
            }
            Err(err) => {
                self.inner.notifier.error(banner_text(&err));
                Err(err.into())
            }
        }
    }

    /// Alias for [`load`](Self::load), for readers of polling call sites.
    ///
    /// # Errors
    ///
    /// See [`load`](Self::load).
    pub async fn refresh(&self) -> Result<PanelView, PanelError> {
        self.load().await
    }

    /// Toggle a gate after asking for confirmation.
    ///
    /// The decision which endpoint to call is made from the typed state,
    /// never from anything rendered. A declined prompt sends no request.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::Device`] when the command fails; the failure is
    /// posted to the banner and the snapshot is re-fetched so the state
    /// stays consistent with the device.
    pub async fn toggle_gate(
        &self,
        gate: GateId,
        prompt: &impl ConfirmationPrompt,
    ) -> Result<ToggleOutcome, PanelError> {
        let position = self.inner.slot(gate).position;
        let verb = if position.is_open() { "close" } else { "open" };
        let question = format!("Are you sure you want to {verb} gate {gate}?");
        if !prompt.confirm(&question).await {
            tracing::debug!(gate = %gate, "toggle declined");
            return Ok(ToggleOutcome::Declined);
        }

        let result = match position {
            GatePosition::Open => self.inner.api.close_gate(gate).await,
            GatePosition::Closed => self.inner.api.open_gate(gate).await,
        };
        match result {
            Ok(()) => {
                let new_position = position.toggled();
                self.inner.set_position(gate, new_position);
                let done = if new_position.is_open() {
                    "opened"
                } else {
                    "closed"
                };
                self.inner
                    .notifier
                    .success(format!("Gate {gate} has been {done}!"));
                Ok(ToggleOutcome::Toggled(new_position))
            }
            Err(err) => Err(self.fail_and_resync(err).await),
        }
    }

    /// Parse a user-entered local date-time, send it to the device, and arm
    /// the countdown. Returns the display text for the stored schedule.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::Schedule`] for unparseable input (nothing is
    /// sent), or [`PanelError::Device`] when the request fails — in which
    /// case no timer is armed and the snapshot is re-fetched.
    pub async fn set_schedule(&self, gate: GateId, text: &str) -> Result<String, PanelError> {
        let target = parse_local(text)?;
        match self.inner.api.set_schedule(gate, target).await {
            Ok(()) => {
                self.inner.set_schedule_slot(gate, Some(target));
                self.arm_gate(gate, target);
                self.inner.notifier.success("Schedule updated");
                Ok(format_local(target))
            }
            Err(err) => Err(self.fail_and_resync(err).await),
        }
    }

    /// Remove a gate's schedule on the device and cancel the local timer.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::Device`] when the request fails; the timer is
    /// left armed in that case because the device still holds the schedule.
    pub async fn clear_schedule(&self, gate: GateId) -> Result<(), PanelError> {
        match self.inner.api.clear_schedule(gate).await {
            Ok(()) => {
                // Without this a stale timer would fire after the clear and
                // wrongly mark the gate open.
                self.inner.timers.cancel(gate);
                self.inner.set_schedule_slot(gate, None);
                self.inner.notifier.success("Schedule updated");
                Ok(())
            }
            Err(err) => Err(self.fail_and_resync(err).await),
        }
    }

    /// Current read-only view of the panel.
    #[must_use]
    pub fn view(&self) -> PanelView {
        let gates = {
            let slots = self.inner.lock_gates();
            GateId::ALL.map(|id| {
                let slot = slots[id.index()];
                GateView {
                    id,
                    position: slot.position,
                    schedule: slot.schedule,
                    schedule_text: slot
                        .schedule
                        .map_or_else(|| SCHEDULE_NOT_SET.to_string(), format_local),
                }
            })
        };
        PanelView {
            connected: self.inner.connected.load(Ordering::SeqCst),
            gates,
            server_time: (self.inner.mode == PageMode::StatusOnly
                && self.inner.clock.is_running())
            .then(|| self.inner.clock.display()),
        }
    }

    /// Subscribe to banner changes.
    #[must_use]
    pub fn notifications(&self) -> watch::Receiver<Option<Notification>> {
        self.inner.notifier.subscribe()
    }

    /// The currently visible banner, if any.
    #[must_use]
    pub fn current_notification(&self) -> Option<Notification> {
        self.inner.notifier.current()
    }

    /// Whether a countdown is live for the gate.
    #[must_use]
    pub fn is_armed(&self, gate: GateId) -> bool {
        self.inner.timers.is_armed(gate)
    }

    fn apply_snapshot(&self, snapshot: &InfoSnapshot) {
        self.inner.store_reported(snapshot);
        for gate in GateId::ALL {
            match snapshot.gate(gate).schedule() {
                Some(target) => {
                    self.arm_gate(gate, target);
                }
                // A schedule cleared on the device side supersedes any
                // countdown armed from an earlier snapshot.
                None => {
                    self.inner.timers.cancel(gate);
                }
            }
        }
        if self.inner.mode == PageMode::StatusOnly {
            self.inner.clock.start(snapshot.time);
        }
    }

    fn arm_gate(&self, gate: GateId, target: EpochSeconds) -> bool {
        let inner = Arc::clone(&self.inner);
        self.inner.timers.arm(gate, target, async move {
            inner.set_position(gate, GatePosition::Open);
            inner
                .notifier
                .success(format!("Gate {gate} has been opened!"));
            // The device opens the gate itself when the schedule elapses;
            // the flip above is cosmetic, so adopt its view right away.
            match inner.api.fetch_info().await {
                Ok(snapshot) => inner.store_reported(&snapshot),
                Err(err) => {
                    tracing::warn!(gate = %gate, error = %err, "reconciliation fetch failed");
                }
            }
        })
    }

    async fn fail_and_resync(&self, err: DeviceError) -> PanelError {
        self.inner.notifier.error(banner_text(&err));
        match self.inner.api.fetch_info().await {
            Ok(snapshot) => self.inner.store_reported(&snapshot),
            Err(fetch_err) => {
                tracing::warn!(error = %fetch_err, "resync fetch after failed action failed");
            }
        }
        err.into()
    }
}

/// Text shown on the banner for a failed request.
fn banner_text(err: &DeviceError) -> String {
    match err {
        DeviceError::Http { status_text, .. } if !status_text.is_empty() => status_text.clone(),
        DeviceError::Http { status, .. } => format!("Request failed with status {status}"),
        DeviceError::Timeout => "A timeout has occurred".to_string(),
        other => format!("An error has occurred: {other}"),
    }
}
