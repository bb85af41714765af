//! Instruction Registry
//!
//! Command code to declaration table. Filled once, then only read.

use std::collections::HashMap;

use super::schema::{InstructionDecl, ParameterDecl, UnknownPolicy};
use crate::machine::handlers;

/// In-memory table of known commands
#[derive(Debug, Clone, Default)]
pub struct InstructionRegistry {
    instructions: HashMap<String, InstructionDecl>,
    unknown_commands: UnknownPolicy,
}

impl InstructionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in printer commands
    pub fn with_builtin_commands() -> Self {
        let mut registry = Self::new();
        registry.add_builtin_commands();
        registry
    }

    /// Insert or replace the declaration for its command code
    pub fn register(&mut self, decl: InstructionDecl) {
        if self.instructions.contains_key(&decl.code) {
            log::debug!("Replacing declaration for {}", decl.code);
        }
        self.instructions.insert(decl.code.clone(), decl);
    }

    pub fn lookup(&self, code: &str) -> Option<&InstructionDecl> {
        self.instructions.get(code)
    }

    pub fn unknown_commands(&self) -> UnknownPolicy {
        self.unknown_commands
    }

    pub fn set_unknown_commands(&mut self, policy: UnknownPolicy) {
        self.unknown_commands = policy;
    }

    /// List all registered command codes
    pub fn list_commands(&self) -> Vec<&str> {
        self.instructions.keys().map(|s| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    fn add_builtin_commands(&mut self) {
        let axes = || {
            ['X', 'Y', 'Z', 'E']
                .into_iter()
                .map(ParameterDecl::float)
        };
        let temperature = || [ParameterDecl::float('S')];

        self.register(InstructionDecl::new("G28", handlers::home));

        for code in ["G0", "G1"] {
            self.register(
                InstructionDecl::new(code, handlers::linear_move)
                    .optional(axes().chain([ParameterDecl::float('F')])),
            );
        }

        self.register(InstructionDecl::new("G90", handlers::absolute_positioning));
        self.register(InstructionDecl::new("G91", handlers::relative_positioning));
        self.register(InstructionDecl::new("G92", handlers::set_position).optional(axes()));
        self.register(InstructionDecl::new("M82", handlers::absolute_extrusion));
        self.register(InstructionDecl::new("M83", handlers::relative_extrusion));

        for code in ["M104", "M109"] {
            self.register(InstructionDecl::new(code, handlers::set_hotend).optional(temperature()));
        }
        for code in ["M140", "M190"] {
            self.register(InstructionDecl::new(code, handlers::set_bed).optional(temperature()));
        }
        self.register(InstructionDecl::new("M106", handlers::set_fan).optional(temperature()));
    }
}
