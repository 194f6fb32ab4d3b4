//! Device port — the gate controller's HTTP API as a trait.
//!
//! The device exposes five unauthenticated GET endpoints. Command endpoints
//! (`open`, `close`, `setdate`, `cleardate`) succeed with any 2xx; their
//! bodies carry nothing of interest. Implementations must **always settle**:
//! an HTTP error, a transport error, and a client-side timeout each resolve
//! to a [`DeviceError`], never to a hung future.

use std::future::Future;

use irispanel_domain::error::DeviceError;
use irispanel_domain::gate::GateId;
use irispanel_domain::snapshot::InfoSnapshot;
use irispanel_domain::time::EpochSeconds;

/// Driven port for the gate controller device.
pub trait DeviceApi: Send + Sync {
    /// Fetch the device's state snapshot (`/api/info`).
    fn fetch_info(&self) -> impl Future<Output = Result<InfoSnapshot, DeviceError>> + Send;

    /// Open a gate (`/api/open?g=<gate>`).
    fn open_gate(&self, gate: GateId) -> impl Future<Output = Result<(), DeviceError>> + Send;

    /// Close a gate (`/api/close?g=<gate>`).
    fn close_gate(&self, gate: GateId) -> impl Future<Output = Result<(), DeviceError>> + Send;

    /// Schedule a future opening (`/api/setdate?g=<gate>&t=<epoch>`).
    fn set_schedule(
        &self,
        gate: GateId,
        at: EpochSeconds,
    ) -> impl Future<Output = Result<(), DeviceError>> + Send;

    /// Remove a scheduled opening (`/api/cleardate?g=<gate>`).
    fn clear_schedule(&self, gate: GateId)
    -> impl Future<Output = Result<(), DeviceError>> + Send;
}
