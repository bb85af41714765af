//! Parameter Decoder
//!
//! Turns a word like `X12.5` into a typed value using its declaration.

use crate::error::DecodeError;
use crate::instruction::{ParameterDecl, ParameterType};
use crate::parser::ParameterValue;

/// Split a parameter word into its letter and literal
pub fn split_word(word: &str) -> Option<(char, &str)> {
    let mut chars = word.char_indices();
    let (_, letter) = chars.next()?;
    let rest = chars.next().map(|(idx, _)| &word[idx..]).unwrap_or("");
    Some((letter.to_ascii_uppercase(), rest))
}

/// Decode a parameter word against its declaration
pub fn decode_parameter(word: &str, decl: &ParameterDecl) -> Result<ParameterValue, DecodeError> {
    let literal = split_word(word).map(|(_, literal)| literal).unwrap_or("");
    let malformed = || DecodeError {
        literal: literal.to_string(),
        expected: decl.param_type,
    };

    match decl.param_type {
        ParameterType::Float => literal
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .map(ParameterValue::Float)
            .ok_or_else(malformed),
        ParameterType::Int => literal
            .parse::<i64>()
            .map(ParameterValue::Int)
            .map_err(|_| malformed()),
    }
}
