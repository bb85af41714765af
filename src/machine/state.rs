//! Device State
//!
//! Last-known position, temperatures and modal flags of the printer.
//! Absent values mean "never set", which is different from zero.

use std::fmt;

use serde::Serialize;

use crate::error::StateError;

/// Positional axes, extruder included
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
    E,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
            Axis::E => "E",
        };
        f.write_str(letter)
    }
}

/// Modal interpretation of move targets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PositioningMode {
    #[default]
    Absolute,
    Relative,
}

impl PositioningMode {
    /// Compute the new coordinate for a move target.
    ///
    /// A missing target keeps the current value. A relative target on an
    /// unknown coordinate is an error rather than an offset from zero.
    pub fn apply(
        self,
        axis: Axis,
        current: Option<f64>,
        target: Option<f64>,
    ) -> Result<Option<f64>, StateError> {
        match (self, target) {
            (_, None) => Ok(current),
            (PositioningMode::Absolute, Some(value)) => Ok(Some(value)),
            (PositioningMode::Relative, Some(offset)) => current
                .map(|value| Some(value + offset))
                .ok_or(StateError::UnknownCoordinate(axis)),
        }
    }
}

/// Mutable printer record reduced from a command sequence
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeviceState {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    pub e: Option<f64>,
    pub feed_rate: Option<f64>,
    pub bed_temp: Option<f64>,
    pub hotend_temp: Option<f64>,
    pub fan_speed: Option<f64>,
    pub position_mode: PositioningMode,
    pub extrusion_mode: PositioningMode,
}

impl DeviceState {
    /// Fresh state: nothing known, both modes absolute
    pub fn new() -> Self {
        Self::default()
    }

    pub fn coordinate(&self, axis: Axis) -> Option<f64> {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
            Axis::E => self.e,
        }
    }
}

struct Reading(Option<f64>);

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{value}"),
            None => f.write_str("unknown"),
        }
    }
}

/// Human-readable status line
impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "X:{}, Y:{}, Z:{}, E:{}, Bed:{}°C, Hotend:{}°C, Fan-Speed:{}",
            Reading(self.x),
            Reading(self.y),
            Reading(self.z),
            Reading(self.e),
            Reading(self.bed_temp),
            Reading(self.hotend_temp),
            Reading(self.fan_speed),
        )
    }
}
