//! Snapshot wire model — the device's authoritative view at fetch time.
//!
//! Shape of `/api/info` as emitted by the firmware:
//!
//! ```json
//! {
//!     "RSSI": -50,
//!     "ip": "192.168.1.123",
//!     "time": 1636466400,
//!     "gate_1": { "state": 1, "schedule": 0 },
//!     "gate_2": { "state": 0, "schedule": 1636466400 }
//! }
//! ```
//!
//! `state` arrives as `0`/`1` from older firmware and as a JSON bool from
//! newer builds; both are accepted. A `schedule` of `0` means unset.

use serde::{Deserialize, Serialize};

use crate::gate::{GateId, GatePosition};
use crate::time::EpochSeconds;

/// Point-in-time report of both gates plus connectivity info.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoSnapshot {
    /// Device clock, epoch seconds.
    pub time: EpochSeconds,
    /// Whether the device considers itself connected. Older firmware omits
    /// the field entirely; absence is treated as connected.
    #[serde(rename = "isConnected", default = "default_connected")]
    pub is_connected: bool,
    /// Wi-Fi signal strength in dBm, when reported.
    #[serde(rename = "RSSI", default, skip_serializing_if = "Option::is_none")]
    pub rssi: Option<i32>,
    /// Device IP address, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    /// Garden gate.
    pub gate_1: GateReport,
    /// Driveway gate.
    pub gate_2: GateReport,
}

fn default_connected() -> bool {
    true
}

impl InfoSnapshot {
    /// Report for the given gate.
    #[must_use]
    pub fn gate(&self, id: GateId) -> &GateReport {
        match id {
            GateId::One => &self.gate_1,
            GateId::Two => &self.gate_2,
        }
    }
}

/// Per-gate section of the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateReport {
    /// Open/closed flag; accepts both `0`/`1` and `true`/`false`.
    #[serde(with = "state_flag")]
    pub state: bool,
    /// Scheduled opening as epoch seconds; `0` means unset.
    #[serde(default)]
    pub schedule: EpochSeconds,
}

impl GateReport {
    /// Position implied by the state flag.
    #[must_use]
    pub fn position(&self) -> GatePosition {
        if self.state {
            GatePosition::Open
        } else {
            GatePosition::Closed
        }
    }

    /// The schedule, with the `0` sentinel normalised away.
    #[must_use]
    pub fn schedule(&self) -> Option<EpochSeconds> {
        (self.schedule != 0).then_some(self.schedule)
    }
}

/// Serde shim for the firmware's integer-or-bool `state` field.
mod state_flag {
    use serde::de::{Deserializer, Error};
    use serde::ser::Serializer;
    use serde::Deserialize;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Number(u8),
        Bool(bool),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        match Flag::deserialize(deserializer)? {
            Flag::Number(0) => Ok(false),
            Flag::Number(1) => Ok(true),
            Flag::Number(other) => Err(D::Error::custom(format!("invalid gate state: {other}"))),
            Flag::Bool(value) => Ok(value),
        }
    }

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }
}
