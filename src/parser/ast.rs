//! Parsed command lines.
//!
//! Pure data: a resolved instruction and the decoded values keyed by letter.

use std::collections::BTreeMap;

use crate::instruction::InstructionDecl;

/// Outcome of parsing one raw line
#[derive(Debug, Clone)]
pub enum LineOutcome<'r> {
    /// A registered command with validated parameters
    Parsed(ParsedLine<'r>),
    /// Nothing to apply: blank, comment-only, or an ignored unknown command
    Skip,
}

/// A command line resolved against the registry
#[derive(Debug, Clone)]
pub struct ParsedLine<'r> {
    pub instruction: &'r InstructionDecl,
    pub parameters: Parameters,
}

impl ParsedLine<'_> {
    pub fn code(&self) -> &str {
        &self.instruction.code
    }
}

/// A decoded parameter literal
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParameterValue {
    Float(f64),
    Int(i64),
}

impl ParameterValue {
    pub fn as_f64(self) -> f64 {
        match self {
            ParameterValue::Float(value) => value,
            ParameterValue::Int(value) => value as f64,
        }
    }
}

/// Decoded parameters keyed by uppercase letter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters(BTreeMap<char, ParameterValue>);

impl Parameters {
    pub fn get(&self, letter: char) -> Option<ParameterValue> {
        self.0.get(&letter).copied()
    }

    /// Numeric value of a parameter, if it was given
    pub fn float(&self, letter: char) -> Option<f64> {
        self.get(letter).map(ParameterValue::as_f64)
    }

    pub fn contains(&self, letter: char) -> bool {
        self.0.contains_key(&letter)
    }

    pub fn letters(&self) -> impl Iterator<Item = char> + '_ {
        self.0.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Record a value; a repeated letter replaces the earlier one
    pub fn insert(&mut self, letter: char, value: ParameterValue) {
        self.0.insert(letter, value);
    }
}

impl FromIterator<(char, ParameterValue)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (char, ParameterValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
