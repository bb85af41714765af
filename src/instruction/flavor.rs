//! Flavor files
//!
//! Firmware-specific command tables loaded from TOML and layered on top of
//! the built-in registry.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

use super::registry::InstructionRegistry;
use super::schema::{InstructionDecl, ParameterDecl, ParameterType, UnknownPolicy};
use crate::machine::handlers;

/// Root flavor file structure (matches TOML)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FlavorFile {
    pub flavor: FlavorMeta,
    #[serde(default)]
    pub commands: Vec<CommandDef>,
}

/// Flavor metadata
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FlavorMeta {
    pub name: String,
    pub description: Option<String>,
    pub unknown_commands: Option<UnknownPolicy>,
}

/// Command entry bound to one of the built-in behaviors
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CommandDef {
    pub name: String,
    pub behavior: String,
    #[serde(default)]
    pub unknown_parameters: UnknownPolicy,
    #[serde(default)]
    pub parameters: Vec<ParameterDef>,
}

/// Command parameter definition
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ParameterDef {
    pub name: String,
    #[serde(rename = "type", default = "default_type")]
    pub param_type: ParameterType,
    #[serde(default)]
    pub required: bool,
}

fn default_type() -> ParameterType {
    ParameterType::Float
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlavorError {
    #[error("command '{command}' uses unknown behavior '{behavior}'")]
    UnknownBehavior { command: String, behavior: String },

    #[error("command '{command}' declares invalid parameter name '{name}'")]
    InvalidParameterName { command: String, name: String },

    #[error("command '{command}' declares parameter '{letter}' more than once")]
    DuplicateParameter { command: String, letter: char },
}

impl FlavorFile {
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse flavor TOML")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read flavor file {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Invalid flavor file {}", path.display()))
    }
}

impl CommandDef {
    fn to_decl(&self) -> Result<InstructionDecl, FlavorError> {
        let handler =
            handlers::by_name(&self.behavior).ok_or_else(|| FlavorError::UnknownBehavior {
                command: self.name.clone(),
                behavior: self.behavior.clone(),
            })?;

        let mut required = Vec::new();
        let mut optional = Vec::new();
        let mut seen = Vec::new();

        for param in &self.parameters {
            let letter = param_letter(&param.name).ok_or_else(|| {
                FlavorError::InvalidParameterName {
                    command: self.name.clone(),
                    name: param.name.clone(),
                }
            })?;
            if seen.contains(&letter) {
                return Err(FlavorError::DuplicateParameter {
                    command: self.name.clone(),
                    letter,
                });
            }
            seen.push(letter);

            let decl = ParameterDecl {
                letter,
                param_type: param.param_type,
            };
            if param.required {
                required.push(decl);
            } else {
                optional.push(decl);
            }
        }

        Ok(InstructionDecl::new(&self.name, handler)
            .required(required)
            .optional(optional)
            .unknown_parameters(self.unknown_parameters))
    }
}

fn param_letter(name: &str) -> Option<char> {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => Some(c.to_ascii_uppercase()),
        _ => None,
    }
}

impl InstructionRegistry {
    /// Register every command of a flavor, replacing existing declarations.
    ///
    /// The file is validated as a whole first, so a rejected flavor leaves the
    /// registry untouched.
    pub fn apply_flavor(&mut self, flavor: &FlavorFile) -> Result<(), FlavorError> {
        let decls = flavor
            .commands
            .iter()
            .map(CommandDef::to_decl)
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!(
            "Applying flavor '{}' ({} commands)",
            flavor.flavor.name,
            decls.len()
        );

        for decl in decls {
            self.register(decl);
        }
        if let Some(policy) = flavor.flavor.unknown_commands {
            self.set_unknown_commands(policy);
        }

        Ok(())
    }
}
