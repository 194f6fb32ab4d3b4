//! # irispanel-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `DeviceApi` — the five HTTP endpoints of the gate controller
//!   - `ConfirmationPrompt` — user confirmation before a gate moves
//! - Provide the **panel controller** (load snapshot, toggle, set/clear
//!   schedule) and its supporting machinery:
//!   - `ScheduleTimers` — one cancellable countdown per gate
//!   - `Notifier` — transient banner state with auto-dismiss
//!   - `ServerClock` — locally ticked copy of the device clock
//! - Orchestrate domain objects without knowing *how* the device is reached
//!
//! ## Dependency rule
//! Depends on `irispanel-domain` only (plus `tokio` for tasks and channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the
//! reverse.

pub mod notifier;
pub mod panel;
pub mod ports;
pub mod scheduler;
pub mod server_clock;
