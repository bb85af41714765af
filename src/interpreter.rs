//! Dispatcher
//!
//! Drives lines through the parser and applies each resolved command to the
//! device state, strictly in input order. The first failure ends the replay.

use crate::error::{InterpreterError, ReplayError, StateError};
use crate::instruction::InstructionRegistry;
use crate::machine::DeviceState;
use crate::parser::{self, LineOutcome};

/// Fresh device state paired with the built-in command table
pub fn create_interpreter() -> (DeviceState, InstructionRegistry) {
    (
        DeviceState::new(),
        InstructionRegistry::with_builtin_commands(),
    )
}

/// Apply one raw line to the state.
///
/// Nothing is mutated when an error is returned.
pub fn process_line(
    state: &mut DeviceState,
    registry: &InstructionRegistry,
    line: &str,
) -> Result<(), InterpreterError> {
    let parsed = match parser::parse_line(line, registry)? {
        LineOutcome::Parsed(parsed) => parsed,
        LineOutcome::Skip => return Ok(()),
    };

    log::trace!("Applying {} {:?}", parsed.code(), parsed.parameters);

    (parsed.instruction.handler)(state, &parsed.parameters).map_err(|err| match err {
        StateError::UnknownCoordinate(axis) => InterpreterError::InvalidState {
            command: parsed.code().to_string(),
            axis,
        },
    })
}

/// Apply lines in order, stopping at the first failure
pub fn process_lines<I, S>(
    state: &mut DeviceState,
    registry: &InstructionRegistry,
    lines: I,
) -> Result<(), ReplayError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut line_number = 0;
    for line in lines {
        line_number += 1;
        let line = line.as_ref();
        process_line(state, registry, line).map_err(|source| ReplayError {
            line_number,
            line: line.to_string(),
            source,
        })?;
    }

    log::debug!("Replayed {} lines", line_number);
    Ok(())
}
