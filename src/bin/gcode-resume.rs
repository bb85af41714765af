use anyhow::{Context, Result};
use gcode_resume::config::Config;
use gcode_resume::resume;

fn main() -> Result<()> {
    let config = Config::from_args_and_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    let report = resume::run(&config)?;

    if config.json {
        let state = serde_json::to_string_pretty(&report.state)
            .context("Failed to serialize printer state")?;
        println!("{}", state);
    } else {
        println!("Using the following gcode to locate the position of failure:");
        println!("{}\n", report.window.join("\n"));
        println!("Resuming at line number: {}\n", report.resume_line);
        println!("Latest printer state:");
        println!("{}", report.state);
    }

    Ok(())
}
