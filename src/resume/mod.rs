//! Resume file generation
//!
//! The application around the interpreter: read the terminal log and the
//! original program, find where printing stopped, replay everything before
//! that point and write a program that continues from there.

pub mod locate;
pub mod script;
pub mod terminal;

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::Config;
use crate::instruction::{FlavorFile, InstructionRegistry, UnknownPolicy};
use crate::interpreter;
use crate::machine::DeviceState;

pub use locate::{locate_resume_line, LocateError};
pub use script::{build_resume_program, Point, PrimeLine, ResumeOptions};
pub use terminal::sent_commands;

/// Outcome of a successful resume run
#[derive(Debug, Clone)]
pub struct ResumeReport {
    /// Sent commands used to locate the resume point
    pub window: Vec<String>,
    /// 0-based index of the first program line in the remainder
    pub resume_line: usize,
    pub state: DeviceState,
    pub output: PathBuf,
}

/// Built-in registry extended by the configured flavor files
pub fn build_registry(config: &Config) -> Result<InstructionRegistry> {
    let mut registry = InstructionRegistry::with_builtin_commands();

    for path in &config.flavor_files {
        let flavor = FlavorFile::load(path)?;
        registry
            .apply_flavor(&flavor)
            .with_context(|| format!("Invalid flavor file {}", path.display()))?;
        log::info!("Loaded flavor '{}' from {}", flavor.flavor.name, path.display());
    }

    if config.strict {
        registry.set_unknown_commands(UnknownPolicy::Fail);
    }

    Ok(registry)
}

/// Generate the resume program described by `config`
pub fn run(config: &Config) -> Result<ResumeReport> {
    let log_file = File::open(&config.log)
        .with_context(|| format!("Failed to open log file {}", config.log.display()))?;
    let sent = sent_commands(BufReader::new(log_file))
        .with_context(|| format!("Failed to read log file {}", config.log.display()))?;

    let program = read_program(&config.gcode)?;

    let resume_line = locate_resume_line(&program, &sent, config.window)?;
    let window = sent[sent.len().saturating_sub(config.window.max(1))..].to_vec();
    log::info!("Last sent command is program line {}", resume_line);

    let registry = build_registry(config)?;
    let mut state = DeviceState::new();
    interpreter::process_lines(&mut state, &registry, &program[..resume_line])
        .context("Failed to reconstruct the printer state")?;

    let gcode = build_resume_program(&program, resume_line, &state, &config.options)
        .context("Cannot resume from the reconstructed state")?;

    fs::write(&config.output, gcode.join("\n"))
        .with_context(|| format!("Failed to write {}", config.output.display()))?;
    log::info!("Wrote resume program to {}", config.output.display());

    Ok(ResumeReport {
        window,
        resume_line,
        state,
        output: config.output.clone(),
    })
}

/// Program lines with surrounding whitespace removed
fn read_program(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read G-code file {}", path.display()))?;
    Ok(content.lines().map(|line| line.trim().to_string()).collect())
}
