//! # irispanel-domain
//!
//! Pure domain model for the iris gate panel.
//!
//! ## Responsibilities
//! - Foundational types: gate identity, timestamps, error conventions
//! - Define **gate state** (open/closed position plus an optional schedule)
//! - Define the **snapshot** wire model reported by the device (`/api/info`)
//! - Define **notifications** (transient success/error banner messages)
//! - Local date-time parsing and display formatting for schedules
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod gate;
pub mod notification;
pub mod snapshot;
pub mod time;
