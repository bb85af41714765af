//! Replay behavior through the public interpreter API
use gcode_resume::instruction::{InstructionDecl, ParameterDecl, UnknownPolicy};
use gcode_resume::machine::{handlers, Axis, PositioningMode};
use gcode_resume::{
    create_interpreter, parse_line, process_line, process_lines, DeviceState, InterpreterError,
    LineOutcome,
};

fn apply(state: &mut DeviceState, lines: &[&str]) {
    let (_, registry) = create_interpreter();
    process_lines(state, &registry, lines).expect("replay succeeds");
}

#[test]
fn test_home_from_fresh_state() {
    let (mut state, registry) = create_interpreter();
    process_line(&mut state, &registry, "G28").unwrap();

    let expected = DeviceState {
        x: Some(0.0),
        y: Some(0.0),
        z: Some(0.0),
        ..DeviceState::new()
    };
    assert_eq!(state, expected);
}

#[test]
fn test_move_relative_then_set_position() {
    let (mut state, _) = create_interpreter();

    apply(&mut state, &["G90", "G1 X10 Y5 Z0.2 E3"]);
    assert_eq!(state.x, Some(10.0));
    assert_eq!(state.y, Some(5.0));
    assert_eq!(state.z, Some(0.2));
    assert_eq!(state.e, Some(3.0));
    assert_eq!(state.feed_rate, None);

    apply(&mut state, &["G91", "G1 X5"]);
    assert_eq!(state.x, Some(15.0));
    assert_eq!(state.y, Some(5.0));
    assert_eq!(state.z, Some(0.2));
    assert_eq!(state.e, Some(3.0));

    apply(&mut state, &["G92 E0"]);
    assert_eq!(state.e, Some(0.0));
    assert_eq!(state.x, Some(15.0));
    assert_eq!(state.y, Some(5.0));
    assert_eq!(state.z, Some(0.2));
}

#[test]
fn test_relative_move_on_fresh_state_fails() {
    let (mut state, registry) = create_interpreter();
    let err = process_lines(&mut state, &registry, ["G91", "G1 X5"]).unwrap_err();

    assert_eq!(err.line_number, 2);
    assert_eq!(
        err.kind(),
        &InterpreterError::InvalidState {
            command: "G1".to_string(),
            axis: Axis::X,
        }
    );
}

#[test]
fn test_comment_and_blank_lines_are_noops() {
    let (mut state, registry) = create_interpreter();
    for line in ["; just a comment", "", "    ", ";G28"] {
        process_line(&mut state, &registry, line).unwrap();
        assert_eq!(state, DeviceState::new());
    }

    apply(&mut state, &["G28", "G1 X4 F1200", "M104 S205"]);
    let before = state.clone();
    process_line(&mut state, &registry, "   ; layer change").unwrap();
    assert_eq!(state, before);
}

#[test]
fn test_home_keeps_everything_else() {
    let (mut state, _) = create_interpreter();
    apply(
        &mut state,
        &[
            "M140 S60",
            "M190 S60",
            "M104 S200",
            "M109 S210",
            "M106 S127",
            "G92 X50 Y60 Z7 E12",
            "G1 F3000",
        ],
    );
    let before = state.clone();

    apply(&mut state, &["G28"]);
    assert_eq!(
        state,
        DeviceState {
            x: Some(0.0),
            y: Some(0.0),
            z: Some(0.0),
            ..before
        }
    );
    assert_eq!(state.bed_temp, Some(60.0));
    assert_eq!(state.hotend_temp, Some(210.0));
    assert_eq!(state.fan_speed, Some(127.0));
    assert_eq!(state.e, Some(12.0));
    assert_eq!(state.feed_rate, Some(3000.0));
}

#[test]
fn test_set_position_is_mode_independent() {
    for mode in ["G90", "G91", "M83"] {
        let (mut state, _) = create_interpreter();
        apply(&mut state, &["G28", mode, "G92 X1.5 Y2.5 Z3.5 E4.5"]);
        assert_eq!(
            (state.x, state.y, state.z, state.e),
            (Some(1.5), Some(2.5), Some(3.5), Some(4.5)),
            "after {mode}"
        );
    }
}

#[test]
fn test_extrusion_mode_is_independent() {
    let (mut state, _) = create_interpreter();
    apply(
        &mut state,
        &["G28", "G92 E0", "M83", "G1 X10 E1.5", "G1 X20 E1.5", "G1 E-0.5 F2400"],
    );

    assert_eq!(state.position_mode, PositioningMode::Absolute);
    assert_eq!(state.extrusion_mode, PositioningMode::Relative);
    assert_eq!(state.x, Some(20.0));
    assert_eq!(state.e, Some(2.5));
    assert_eq!(state.feed_rate, Some(2400.0));

    apply(&mut state, &["M82", "G1 E7"]);
    assert_eq!(state.e, Some(7.0));
}

#[test]
fn test_g0_and_g1_track_feed_rate() {
    let (mut state, _) = create_interpreter();
    apply(&mut state, &["G28", "G0 X5 F9000", "G1 X6"]);
    assert_eq!(state.feed_rate, Some(9000.0));

    apply(&mut state, &["G1 X7 F1200"]);
    assert_eq!(state.feed_rate, Some(1200.0));
}

#[test]
fn test_replay_is_deterministic() {
    let program = [
        "; generated by a slicer",
        "M140 S60",
        "M104 S210",
        "G28 ; home all",
        "G92 E0",
        "G1 Z0.3 F3000",
        "G1 X10 Y10 E0.5 F1500",
        "M106 S255",
        "G91",
        "G1 X1 Y-1 E0.1",
        "G90",
        "M600 ; unsupported",
        "G1 X20 Y20 E1.2",
    ];

    let (mut first, registry) = create_interpreter();
    let (mut second, _) = create_interpreter();
    process_lines(&mut first, &registry, program).unwrap();
    process_lines(&mut second, &registry, program).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.x, Some(20.0));
    assert_eq!(first.e, Some(1.2));
    assert_eq!(first.fan_speed, Some(255.0));
}

#[test]
fn test_unknown_command_policies() {
    let (mut state, mut registry) = create_interpreter();
    process_line(&mut state, &registry, "M420 S1").unwrap();
    assert_eq!(state, DeviceState::new());

    registry.set_unknown_commands(UnknownPolicy::Fail);
    let err = process_line(&mut state, &registry, "M420 S1").unwrap_err();
    assert_eq!(
        err,
        InterpreterError::UnknownCommand {
            command: "M420".to_string()
        }
    );
}

#[test]
fn test_parsed_keys_match_given_letters() {
    let (_, registry) = create_interpreter();
    let cases = [
        ("G28", ""),
        ("G1 X1", "X"),
        ("G0 Z0.2 F600", "FZ"),
        ("G1 X1 Y2 Z3 E4 F5", "EFXYZ"),
        ("G92 E0", "E"),
        ("M106 S0", "S"),
    ];

    for (line, letters) in cases {
        match parse_line(line, &registry).unwrap() {
            LineOutcome::Parsed(parsed) => {
                assert_eq!(parsed.parameters.letters().collect::<String>(), letters);
            }
            LineOutcome::Skip => panic!("{line} was skipped"),
        }
    }
}

#[test]
fn test_required_parameters_with_custom_command() {
    let (mut state, mut registry) = create_interpreter();
    registry.register(
        InstructionDecl::new("M109", handlers::set_hotend).required([ParameterDecl::float('S')]),
    );

    let err = process_line(&mut state, &registry, "M109 R200").unwrap_err();
    assert!(matches!(
        err,
        InterpreterError::MissingParameter { ref missing, .. } if missing.contains(&'S')
    ));
    assert_eq!(state.hotend_temp, None);

    process_line(&mut state, &registry, "M109 S215").unwrap();
    assert_eq!(state.hotend_temp, Some(215.0));
}
