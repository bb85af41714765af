//! State handlers bound to command codes.
//!
//! Each handler either applies completely or returns an error before touching
//! the state. Absent parameters leave their field unchanged.

use super::state::{Axis, DeviceState, PositioningMode};
use crate::error::StateError;
use crate::instruction::Handler;
use crate::parser::Parameters;

/// G28: define the origin for X, Y and Z
pub fn home(state: &mut DeviceState, _: &Parameters) -> Result<(), StateError> {
    state.x = Some(0.0);
    state.y = Some(0.0);
    state.z = Some(0.0);
    Ok(())
}

/// G0/G1: linear move, interpreted through the modal flags
pub fn linear_move(state: &mut DeviceState, params: &Parameters) -> Result<(), StateError> {
    let mode = state.position_mode;
    let x = mode.apply(Axis::X, state.x, params.float('X'))?;
    let y = mode.apply(Axis::Y, state.y, params.float('Y'))?;
    let z = mode.apply(Axis::Z, state.z, params.float('Z'))?;
    let e = state
        .extrusion_mode
        .apply(Axis::E, state.e, params.float('E'))?;

    state.x = x;
    state.y = y;
    state.z = z;
    state.e = e;
    if let Some(feed_rate) = params.float('F') {
        state.feed_rate = Some(feed_rate);
    }
    Ok(())
}

/// G90
pub fn absolute_positioning(state: &mut DeviceState, _: &Parameters) -> Result<(), StateError> {
    state.position_mode = PositioningMode::Absolute;
    state.extrusion_mode = PositioningMode::Absolute;
    Ok(())
}

/// G91
pub fn relative_positioning(state: &mut DeviceState, _: &Parameters) -> Result<(), StateError> {
    state.position_mode = PositioningMode::Relative;
    state.extrusion_mode = PositioningMode::Relative;
    Ok(())
}

/// G92: redefine coordinates, ignoring the modal flags
pub fn set_position(state: &mut DeviceState, params: &Parameters) -> Result<(), StateError> {
    let coordinates = [
        (&mut state.x, 'X'),
        (&mut state.y, 'Y'),
        (&mut state.z, 'Z'),
        (&mut state.e, 'E'),
    ];
    for (field, letter) in coordinates {
        if let Some(value) = params.float(letter) {
            *field = Some(value);
        }
    }
    Ok(())
}

/// M82
pub fn absolute_extrusion(state: &mut DeviceState, _: &Parameters) -> Result<(), StateError> {
    state.extrusion_mode = PositioningMode::Absolute;
    Ok(())
}

/// M83
pub fn relative_extrusion(state: &mut DeviceState, _: &Parameters) -> Result<(), StateError> {
    state.extrusion_mode = PositioningMode::Relative;
    Ok(())
}

/// M104/M109
pub fn set_hotend(state: &mut DeviceState, params: &Parameters) -> Result<(), StateError> {
    if let Some(temp) = params.float('S') {
        state.hotend_temp = Some(temp);
    }
    Ok(())
}

/// M140/M190
pub fn set_bed(state: &mut DeviceState, params: &Parameters) -> Result<(), StateError> {
    if let Some(temp) = params.float('S') {
        state.bed_temp = Some(temp);
    }
    Ok(())
}

/// M106
pub fn set_fan(state: &mut DeviceState, params: &Parameters) -> Result<(), StateError> {
    if let Some(speed) = params.float('S') {
        state.fan_speed = Some(speed);
    }
    Ok(())
}

/// Fan off, e.g. M107 on Marlin. Only reachable through flavor files.
pub fn fan_off(state: &mut DeviceState, _: &Parameters) -> Result<(), StateError> {
    state.fan_speed = Some(0.0);
    Ok(())
}

/// Resolve a behavior name used in flavor files
pub fn by_name(name: &str) -> Option<Handler> {
    let handler: Handler = match name {
        "home" => home,
        "move" => linear_move,
        "absolute_positioning" => absolute_positioning,
        "relative_positioning" => relative_positioning,
        "set_position" => set_position,
        "absolute_extrusion" => absolute_extrusion,
        "relative_extrusion" => relative_extrusion,
        "set_hotend" => set_hotend,
        "set_bed" => set_bed,
        "set_fan" => set_fan,
        "fan_off" => fan_off,
        _ => return None,
    };
    Some(handler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParameterValue;

    fn params(values: &[(char, f64)]) -> Parameters {
        values
            .iter()
            .map(|&(letter, value)| (letter, ParameterValue::Float(value)))
            .collect()
    }

    fn known_state() -> DeviceState {
        DeviceState {
            x: Some(1.0),
            y: Some(2.0),
            z: Some(3.0),
            e: Some(4.0),
            feed_rate: Some(1500.0),
            bed_temp: Some(60.0),
            hotend_temp: Some(210.0),
            fan_speed: Some(255.0),
            ..DeviceState::default()
        }
    }

    #[test]
    fn test_home_only_touches_xyz() {
        let mut state = known_state();
        home(&mut state, &Parameters::default()).unwrap();

        let expected = DeviceState {
            x: Some(0.0),
            y: Some(0.0),
            z: Some(0.0),
            ..known_state()
        };
        assert_eq!(state, expected);
    }

    #[test]
    fn test_absolute_move() {
        let mut state = known_state();
        linear_move(&mut state, &params(&[('X', 10.0), ('E', 0.5), ('F', 900.0)])).unwrap();

        assert_eq!(state.x, Some(10.0));
        assert_eq!(state.y, Some(2.0));
        assert_eq!(state.e, Some(0.5));
        assert_eq!(state.feed_rate, Some(900.0));
    }

    #[test]
    fn test_relative_move_adds_offsets() {
        let mut state = known_state();
        state.position_mode = PositioningMode::Relative;
        linear_move(&mut state, &params(&[('X', 10.0), ('Z', -1.0), ('E', 2.0)])).unwrap();

        assert_eq!(state.x, Some(11.0));
        assert_eq!(state.z, Some(2.0));
        // extrusion mode is still absolute
        assert_eq!(state.e, Some(2.0));
    }

    #[test]
    fn test_relative_extrusion_only() {
        let mut state = known_state();
        relative_extrusion(&mut state, &Parameters::default()).unwrap();
        linear_move(&mut state, &params(&[('X', 10.0), ('E', 2.0)])).unwrap();

        assert_eq!(state.x, Some(10.0));
        assert_eq!(state.e, Some(6.0));
        assert_eq!(state.position_mode, PositioningMode::Absolute);
    }

    #[test]
    fn test_relative_move_on_unknown_axis_is_atomic() {
        let mut state = DeviceState {
            x: Some(1.0),
            position_mode: PositioningMode::Relative,
            ..DeviceState::default()
        };
        let before = state.clone();

        let err = linear_move(&mut state, &params(&[('X', 5.0), ('Y', 5.0), ('F', 100.0)]));
        assert_eq!(err, Err(StateError::UnknownCoordinate(Axis::Y)));
        assert_eq!(state, before);
    }

    #[test]
    fn test_set_position_ignores_modes() {
        let mut state = known_state();
        relative_positioning(&mut state, &Parameters::default()).unwrap();
        set_position(&mut state, &params(&[('X', 7.0), ('E', 0.0)])).unwrap();

        assert_eq!(state.x, Some(7.0));
        assert_eq!(state.y, Some(2.0));
        assert_eq!(state.e, Some(0.0));
    }

    #[test]
    fn test_modal_commands() {
        let mut state = DeviceState::new();
        relative_positioning(&mut state, &Parameters::default()).unwrap();
        assert_eq!(state.position_mode, PositioningMode::Relative);
        assert_eq!(state.extrusion_mode, PositioningMode::Relative);

        absolute_extrusion(&mut state, &Parameters::default()).unwrap();
        assert_eq!(state.position_mode, PositioningMode::Relative);
        assert_eq!(state.extrusion_mode, PositioningMode::Absolute);

        absolute_positioning(&mut state, &Parameters::default()).unwrap();
        assert_eq!(state.position_mode, PositioningMode::Absolute);
    }

    #[test]
    fn test_temperatures_and_fan() {
        let mut state = known_state();
        set_hotend(&mut state, &params(&[('S', 215.0)])).unwrap();
        set_bed(&mut state, &Parameters::default()).unwrap();
        set_fan(&mut state, &params(&[('S', 0.0)])).unwrap();

        assert_eq!(state.hotend_temp, Some(215.0));
        assert_eq!(state.bed_temp, Some(60.0));
        assert_eq!(state.fan_speed, Some(0.0));
    }

    #[test]
    fn test_by_name() {
        assert!(by_name("move").is_some());
        assert!(by_name("set_fan").is_some());
        assert!(by_name("fan_off").is_some());
        assert!(by_name("G1").is_none());
    }
}
