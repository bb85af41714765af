//! Configuration management for the resume generator.
//!
//! Handles:
//! - Command-line argument parsing
//! - Output path and flavor file resolution

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

use crate::resume::script::{Point, PrimeLine, ResumeOptions};

/// Command-line arguments for the resume generator
#[derive(Debug, Parser)]
#[command(name = "gcode-resume")]
#[command(about = "Resume an interrupted 3D print from its OctoPrint terminal log")]
#[command(version)]
pub struct Args {
    /// Original G-code program
    pub gcode: PathBuf,

    #[arg(short, long, help = "OctoPrint log file")]
    pub log: PathBuf,

    /// Output file, defaults to `<name>_resume.gcode` next to the program
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    #[arg(long, help = "Home all axes before resuming")]
    pub home: bool,

    #[arg(long, help = "Restore bed and hotend temperatures")]
    pub heat: bool,

    #[arg(long, help = "Restore the part cooling fan speed")]
    pub fan: bool,

    #[arg(
        long,
        default_value_t = 0,
        help = "Copy the first N program lines into the start block"
    )]
    pub keep: usize,

    #[arg(long, help = "Draw prime lines before resuming")]
    pub prime: bool,

    #[arg(long, default_value = "0.1,20,0.3", help = "Prime line start as x,y,z")]
    pub prime_start: Point,

    #[arg(long, default_value = "0.1,180,0.3", help = "Prime line end as x,y,z")]
    pub prime_end: Point,

    /// Use the last N sent commands to find the failure position
    #[arg(long, default_value_t = 5)]
    pub lines: usize,

    #[arg(long, help = "Fail on commands the interpreter does not know")]
    pub strict: bool,

    /// Additional flavor files, applied in order
    #[arg(long = "flavor", help = "Flavor TOML file extending the command table")]
    pub flavors: Vec<PathBuf>,

    #[arg(long, help = "Print the reconstructed state as JSON")]
    pub json: bool,

    #[arg(
        long,
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    pub gcode: PathBuf,
    pub log: PathBuf,
    pub output: PathBuf,
    pub options: ResumeOptions,
    /// Number of trailing sent commands used to locate the resume point
    pub window: usize,
    pub strict: bool,
    /// Flavor files in application order; later files win
    pub flavor_files: Vec<PathBuf>,
    pub json: bool,
    pub log_level: String,
}

impl Config {
    /// Create configuration from command-line arguments and the user's config directory
    pub fn from_args_and_env() -> Result<Self> {
        let config = Self::from_args(Args::parse())?;
        Ok(config.with_user_flavor(dirs::config_dir().as_deref()))
    }

    /// Create configuration from explicit arguments only (useful for testing)
    pub fn from_args(args: Args) -> Result<Self> {
        let output = match args.out {
            Some(out) => out,
            None => default_output_path(&args.gcode)?,
        };

        let prime = args.prime.then_some(PrimeLine {
            start: args.prime_start,
            end: args.prime_end,
        });

        Ok(Config {
            gcode: args.gcode,
            log: args.log,
            output,
            options: ResumeOptions {
                home: args.home,
                heat: args.heat,
                fan: args.fan,
                keep: args.keep,
                prime,
            },
            window: args.lines,
            strict: args.strict,
            flavor_files: args.flavors,
            json: args.json,
            log_level: args.log_level,
        })
    }

    /// Prepend `<config_dir>/gcode-resume/flavor.toml` when it exists, so
    /// explicit `--flavor` files still override it
    pub fn with_user_flavor(mut self, config_dir: Option<&Path>) -> Self {
        let Some(config_dir) = config_dir else {
            return self;
        };

        let user_flavor = config_dir.join("gcode-resume").join("flavor.toml");
        if user_flavor.is_file() {
            log::debug!("Using default flavor file {}", user_flavor.display());
            self.flavor_files.insert(0, user_flavor);
        }
        self
    }
}

/// `<dir>/<stem>_resume.gcode` next to the original program
pub fn default_output_path(gcode: &Path) -> Result<PathBuf> {
    let stem = gcode
        .file_stem()
        .with_context(|| format!("Cannot derive an output name from {}", gcode.display()))?;
    Ok(gcode.with_file_name(format!("{}_resume.gcode", stem.to_string_lossy())))
}
