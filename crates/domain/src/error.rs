//! Common error types used across the workspace.
//!
//! Each layer defines typed errors and converts upward via `#[from]`; no
//! `String` catch-all variants at the top level.

/// Top-level panel error.
#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    /// A device request failed (HTTP error, transport error, or timeout).
    #[error("device request failed")]
    Device(#[from] DeviceError),

    /// A schedule could not be interpreted.
    #[error("invalid schedule")]
    Schedule(#[from] ScheduleError),

    /// A gate number outside `1..=2` was referenced.
    #[error("unknown gate")]
    UnknownGate(#[from] crate::gate::InvalidGateId),
}

/// Failure of a single request to the device.
///
/// Every request settles exactly once with success or one of these; a
/// timed-out request is an error, never a dangling future.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// The device answered outside the 2xx range.
    #[error("device returned {status} {status_text}")]
    Http {
        /// Numeric HTTP status code.
        status: u16,
        /// Canonical reason phrase, empty when unknown.
        status_text: String,
    },

    /// The request did not complete within the client-side deadline.
    #[error("device request timed out")]
    Timeout,

    /// Transport-level failure (connection refused, reset, DNS, …).
    #[error("device unreachable: {0}")]
    Network(String),

    /// The device answered 2xx but the body was not the expected JSON.
    #[error("unreadable device response: {0}")]
    Body(String),
}

/// Failure to interpret a user-entered schedule.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    /// The text matched no accepted date-time format.
    #[error("unrecognised date-time: {0:?}")]
    Parse(String),

    /// The local time does not exist (DST gap).
    #[error("nonexistent local time: {0:?}")]
    NonexistentLocalTime(String),
}
