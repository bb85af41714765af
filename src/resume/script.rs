//! Resume program assembly.
//!
//! Builds the start block, the move back to the reconstructed position and
//! appends the unsent remainder of the original program.

use std::str::FromStr;

use thiserror::Error;

use crate::error::StateError;
use crate::machine::{Axis, DeviceState, PositioningMode};

/// Lift applied to Z before travelling back to the resume position
const Z_LIFT: f64 = 2.0;
/// Sideways offset between the two prime lines
const PRIME_OFFSET: f64 = 0.3;

/// A point given on the command line as `x,y,z`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("expected 'x,y,z', got '{0}'")]
pub struct PointParseError(String);

impl FromStr for Point {
    type Err = PointParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| PointParseError(s.to_string()))?;

        match values[..] {
            [x, y, z] => Ok(Point { x, y, z }),
            _ => Err(PointParseError(s.to_string())),
        }
    }
}

/// Endpoints of the two prime lines drawn before resuming
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrimeLine {
    pub start: Point,
    pub end: Point,
}

/// What goes into the start block
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResumeOptions {
    pub home: bool,
    pub heat: bool,
    pub fan: bool,
    /// Number of leading program lines copied verbatim
    pub keep: usize,
    pub prime: Option<PrimeLine>,
}

/// Assemble the whole resume program.
///
/// `resume_line` is the index of the first program line that still has to run.
pub fn build_resume_program<S: AsRef<str>>(
    program: &[S],
    resume_line: usize,
    state: &DeviceState,
    options: &ResumeOptions,
) -> Result<Vec<String>, StateError> {
    let mut gcode = start_block(program, state, options);
    gcode.extend(resume_block(state)?);
    gcode.push("; Remaining gcode".to_string());
    gcode.extend(
        program
            .iter()
            .skip(resume_line)
            .map(|line| line.as_ref().to_string()),
    );
    Ok(gcode)
}

/// Preparation before travelling back: kept lines, homing, heating, fan, priming
pub fn start_block<S: AsRef<str>>(
    program: &[S],
    state: &DeviceState,
    options: &ResumeOptions,
) -> Vec<String> {
    let mut gcode = vec!["; start gcode".to_string()];
    gcode.extend(
        program
            .iter()
            .take(options.keep)
            .map(|line| line.as_ref().to_string()),
    );

    if options.home {
        gcode.push("G28".to_string());
    }

    if options.heat {
        push_setting(&mut gcode, "M190", "bed temperature", state.bed_temp);
        push_setting(&mut gcode, "M109", "hotend temperature", state.hotend_temp);
    }

    if options.fan {
        push_setting(&mut gcode, "M106", "fan speed", state.fan_speed);
    }

    if let Some(prime) = &options.prime {
        gcode.extend(prime_sequence(prime));
    }

    gcode.push("; end of start gcode".to_string());
    gcode
}

/// Travel back to the reconstructed position and restore the extruder
pub fn resume_block(state: &DeviceState) -> Result<Vec<String>, StateError> {
    let known = |axis: Axis| {
        state
            .coordinate(axis)
            .ok_or(StateError::UnknownCoordinate(axis))
    };
    let (x, y, z, e) = (known(Axis::X)?, known(Axis::Y)?, known(Axis::Z)?, known(Axis::E)?);

    let lift = match state.feed_rate {
        Some(feed_rate) => format!("G0 Z{} F{} ;Move up", z + Z_LIFT, feed_rate),
        None => {
            log::warn!("Feed rate unknown, travelling up at the firmware default");
            format!("G0 Z{} ;Move up", z + Z_LIFT)
        }
    };

    let mut gcode = vec![
        "; resume print".to_string(),
        "G90 ;Absolute positioning".to_string(),
        lift,
        format!("G92 E{} ;Set extruder", e),
        format!("G0 X{} Y{} Z{} ;Move to start position", x, y, z),
    ];

    // G91 also switches extrusion, so the M8x line goes last
    if state.position_mode == PositioningMode::Relative {
        gcode.push("G91 ;Relative positioning".to_string());
    }
    gcode.push(match state.extrusion_mode {
        PositioningMode::Absolute => "M82 ;Absolute extrusion".to_string(),
        PositioningMode::Relative => "M83 ;Relative extrusion".to_string(),
    });

    Ok(gcode)
}

fn push_setting(gcode: &mut Vec<String>, code: &str, what: &str, value: Option<f64>) {
    match value {
        Some(value) => gcode.push(format!("{} S{}", code, value)),
        None => log::warn!("No {} was set before the resume point, omitting {}", what, code),
    }
}

fn prime_sequence(prime: &PrimeLine) -> Vec<String> {
    let PrimeLine { start: s, end: e } = *prime;
    vec![
        ";Prime".to_string(),
        "G92 E0 ;Reset Extruder".to_string(),
        "G1 Z6.0 F3000 ;Move Z Axis up little to prevent scratching of Heat Bed".to_string(),
        format!("G1 X{} Y{} F5000.0 ;Move to start position", s.x, s.y),
        format!("G1 X{} Y{} Z{} F5000.0", s.x, s.y, s.z),
        format!("G1 X{} Y{} Z{} F1500.0 E15 ;Draw the first line", e.x, e.y, e.z),
        format!(
            "G1 X{} Y{} Z{} F5000.0 ;Move to side a little",
            e.x + PRIME_OFFSET,
            e.y,
            e.z
        ),
        format!(
            "G1 X{} Y{} Z{} F1500.0 E30 ;Draw the second line",
            s.x + PRIME_OFFSET,
            s.y,
            s.z
        ),
        "G92 E0 ;Reset Extruder".to_string(),
    ]
}
