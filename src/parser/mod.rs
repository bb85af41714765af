//! GCode Line Parser
//!
//! Tokenizes a line, resolves its command in the registry and validates the
//! parameters against the declaration before anything is applied.

pub mod ast;
pub mod decoder;
pub mod lexer;

use std::collections::BTreeSet;

pub use ast::{LineOutcome, ParameterValue, Parameters, ParsedLine};
pub use decoder::decode_parameter;
pub use lexer::{tokenize_line, Tokens};

use crate::error::InterpreterError;
use crate::instruction::{InstructionRegistry, UnknownPolicy};

/// Parse a single line of GCode against the registry
///
/// Blank lines, comment-only lines and unknown commands under the ignore
/// policy come back as [`LineOutcome::Skip`].
pub fn parse_line<'r>(
    line: &str,
    registry: &'r InstructionRegistry,
) -> Result<LineOutcome<'r>, InterpreterError> {
    let Some(tokens) = lexer::tokenize_line(line) else {
        return Ok(LineOutcome::Skip);
    };

    let code = tokens.code.to_ascii_uppercase();
    let Some(instruction) = registry.lookup(&code) else {
        return match registry.unknown_commands() {
            UnknownPolicy::Ignore => {
                log::debug!("Skipping unknown command {}", code);
                Ok(LineOutcome::Skip)
            }
            UnknownPolicy::Fail => Err(InterpreterError::UnknownCommand { command: code }),
        };
    };

    let mut parameters = Parameters::default();
    for word in tokens.params {
        let Some((letter, _)) = decoder::split_word(word) else {
            continue;
        };

        let Some(decl) = instruction.parameter(letter) else {
            match instruction.unknown_parameters {
                UnknownPolicy::Ignore => {
                    log::debug!("Ignoring parameter {} of {}", word, code);
                    continue;
                }
                UnknownPolicy::Fail => {
                    return Err(InterpreterError::UnknownParameter {
                        command: code,
                        letter,
                    });
                }
            }
        };

        let value = decoder::decode_parameter(word, decl).map_err(|source| {
            InterpreterError::MalformedParameter {
                command: code.clone(),
                letter,
                source,
            }
        })?;
        parameters.insert(letter, value);
    }

    let missing: BTreeSet<char> = instruction
        .required
        .keys()
        .copied()
        .filter(|letter| !parameters.contains(*letter))
        .collect();
    if !missing.is_empty() {
        return Err(InterpreterError::MissingParameter {
            command: code,
            missing,
        });
    }

    Ok(LineOutcome::Parsed(ParsedLine {
        instruction,
        parameters,
    }))
}
