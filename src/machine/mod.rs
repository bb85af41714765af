//! Printer state machine
//!
//! The device record and the handlers that mutate it.

pub mod handlers;
pub mod state;

pub use state::{Axis, DeviceState, PositioningMode};
