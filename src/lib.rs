//! GCode Resume
//!
//! Reconstructs a printer's last-known state by replaying the commands it
//! received, so an interrupted print can continue where it stopped.
//!
//! This library provides:
//! - A command registry, line parser and printer state machine
//! - A fail-fast dispatcher replaying ordered command lines
//! - Flavor files extending the built-in command table
//! - Resume program generation from an OctoPrint terminal log

pub mod config;
pub mod error;
pub mod instruction;
pub mod interpreter;
pub mod machine;
pub mod parser;
pub mod resume;

// Re-exports for clean public API
pub use config::Config;
pub use error::{InterpreterError, ReplayError};
pub use instruction::{InstructionDecl, InstructionRegistry};
pub use interpreter::{create_interpreter, process_line, process_lines};
pub use machine::DeviceState;
pub use parser::{parse_line, LineOutcome, ParsedLine};
