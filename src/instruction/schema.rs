//! Instruction Schema Types
//!
//! Declarations the line parser validates against: which letters a command
//! accepts, how their literals decode, and what to do with strangers.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

use crate::error::StateError;
use crate::machine::DeviceState;
use crate::parser::Parameters;

/// State transition bound to a command code
pub type Handler = fn(&mut DeviceState, &Parameters) -> Result<(), StateError>;

/// Parameter data types
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    Float,
    Int,
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterType::Float => f.write_str("float"),
            ParameterType::Int => f.write_str("integer"),
        }
    }
}

/// What to do with something the registry has no declaration for
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UnknownPolicy {
    #[default]
    Ignore,
    Fail,
}

/// A single parameter letter and the type of its literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterDecl {
    pub letter: char,
    pub param_type: ParameterType,
}

impl ParameterDecl {
    pub fn float(letter: char) -> Self {
        Self {
            letter: letter.to_ascii_uppercase(),
            param_type: ParameterType::Float,
        }
    }

    pub fn int(letter: char) -> Self {
        Self {
            letter: letter.to_ascii_uppercase(),
            param_type: ParameterType::Int,
        }
    }
}

/// Everything the interpreter knows about one command code.
///
/// Required and optional letters are disjoint. Built with [`InstructionDecl::new`]
/// and the `required`/`optional` builders.
#[derive(Debug, Clone)]
pub struct InstructionDecl {
    pub code: String,
    pub required: BTreeMap<char, ParameterDecl>,
    pub optional: BTreeMap<char, ParameterDecl>,
    pub handler: Handler,
    pub unknown_parameters: UnknownPolicy,
}

impl InstructionDecl {
    pub fn new(code: &str, handler: Handler) -> Self {
        Self {
            code: code.to_ascii_uppercase(),
            required: BTreeMap::new(),
            optional: BTreeMap::new(),
            handler,
            unknown_parameters: UnknownPolicy::Ignore,
        }
    }

    pub fn required(mut self, params: impl IntoIterator<Item = ParameterDecl>) -> Self {
        for param in params {
            debug_assert!(!self.optional.contains_key(&param.letter));
            self.required.insert(param.letter, param);
        }
        self
    }

    pub fn optional(mut self, params: impl IntoIterator<Item = ParameterDecl>) -> Self {
        for param in params {
            debug_assert!(!self.required.contains_key(&param.letter));
            self.optional.insert(param.letter, param);
        }
        self
    }

    pub fn unknown_parameters(mut self, policy: UnknownPolicy) -> Self {
        self.unknown_parameters = policy;
        self
    }

    /// Find the declaration for a letter among required and optional parameters
    pub fn parameter(&self, letter: char) -> Option<&ParameterDecl> {
        self.required
            .get(&letter)
            .or_else(|| self.optional.get(&letter))
    }
}
