//! Gate identity and position.
//!
//! The device controls exactly two gates, addressed on the wire as `1` and
//! `2`. Identity is a closed enum rather than a number so that an invalid
//! gate can never reach the API layer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier of one of the two gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum GateId {
    One,
    Two,
}

impl GateId {
    /// Both gates, in wire order.
    pub const ALL: [Self; 2] = [Self::One, Self::Two];

    /// Wire value used in query parameters (`g=1` / `g=2`).
    #[must_use]
    pub fn as_number(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }

    /// Zero-based index, for addressing per-gate slots.
    #[must_use]
    pub fn index(self) -> usize {
        (self.as_number() - 1) as usize
    }
}

impl fmt::Display for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_number())
    }
}

impl TryFrom<u8> for GateId {
    type Error = InvalidGateId;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            other => Err(InvalidGateId(other.to_string())),
        }
    }
}

impl From<GateId> for u8 {
    fn from(id: GateId) -> Self {
        id.as_number()
    }
}

impl FromStr for GateId {
    type Err = InvalidGateId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u8>()
            .map_err(|_| InvalidGateId(s.to_string()))
            .and_then(Self::try_from)
    }
}

/// Raised when a gate number other than `1` or `2` is encountered.
#[derive(Debug, thiserror::Error)]
#[error("invalid gate id: {0} (expected 1 or 2)")]
pub struct InvalidGateId(pub String);

/// Physical position of a gate leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatePosition {
    Open,
    #[default]
    Closed,
}

impl GatePosition {
    /// Whether the gate is open.
    #[must_use]
    pub fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }

    /// The opposite position.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Open => Self::Closed,
            Self::Closed => Self::Open,
        }
    }
}

impl fmt::Display for GatePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => f.write_str("open"),
            Self::Closed => f.write_str("closed"),
        }
    }
}
