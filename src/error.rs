//! Error types for the interpreter core.
//!
//! Every error here is permanent for the input that produced it. The
//! interpreter never retries, it stops at the first failure.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::instruction::ParameterType;
use crate::machine::Axis;

/// Errors raised while parsing or applying a single command line.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InterpreterError {
    /// The command code is not registered and the registry is strict.
    #[error("unknown command '{command}'")]
    UnknownCommand { command: String },

    /// The parameter letter is not declared for a strict command.
    #[error("command '{command}' has no parameter '{letter}'")]
    UnknownParameter { command: String, letter: char },

    /// One or more required parameters were not given.
    #[error("required parameters missing for '{command}': {}", join_letters(.missing))]
    MissingParameter {
        command: String,
        missing: BTreeSet<char>,
    },

    /// A parameter literal could not be converted to its declared type.
    #[error("malformed parameter '{letter}' for '{command}'")]
    MalformedParameter {
        command: String,
        letter: char,
        #[source]
        source: DecodeError,
    },

    /// A relative operation referenced a coordinate that was never set.
    #[error("'{command}' moves {axis} relatively but its position is unknown")]
    InvalidState { command: String, axis: Axis },
}

/// A literal that does not fit the declared parameter type.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("'{literal}' is not a valid {expected}")]
pub struct DecodeError {
    pub literal: String,
    pub expected: ParameterType,
}

/// Failures raised by state handlers. The dispatcher attaches the command.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum StateError {
    #[error("{0} position is unknown")]
    UnknownCoordinate(Axis),
}

/// An [`InterpreterError`] located in the replayed input.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("failed to replay line {line_number}: '{line}'")]
pub struct ReplayError {
    /// 1-based position in the replayed sequence
    pub line_number: usize,
    pub line: String,
    #[source]
    pub source: InterpreterError,
}

impl ReplayError {
    pub fn kind(&self) -> &InterpreterError {
        &self.source
    }
}

fn join_letters(letters: &BTreeSet<char>) -> String {
    letters
        .iter()
        .map(char::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
