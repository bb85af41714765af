//! Instruction System
//!
//! Command declarations, the registry that holds them, and TOML flavor files.

pub mod flavor;
pub mod registry;
pub mod schema;

pub use flavor::{FlavorError, FlavorFile};
pub use registry::InstructionRegistry;
pub use schema::{Handler, InstructionDecl, ParameterDecl, ParameterType, UnknownPolicy};
