//! Sent-command extraction from an OctoPrint terminal log.

use std::io::BufRead;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;

/// G command up to the host checksum, e.g. `G1 X5 Y7` in `Send: N42 G1 X5 Y7*71`
static SENT_COMMAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"G\d+[^*]*\*").expect("valid sent-command regex"));

/// Collect the G commands the host sent, in order.
///
/// M commands are left out: the host interleaves its own temperature polls
/// with the program, so they cannot be matched against it. The terminal
/// section ends at the first line that is neither a `Send` nor a `Recv`
/// entry. Blank lines are tolerated.
pub fn sent_commands<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut commands = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read log line {}", idx + 1))?;

        if line.starts_with("Send") {
            match SENT_COMMAND.find(&line) {
                Some(m) => {
                    let command = &line[m.start()..m.end() - 1];
                    commands.push(command.trim_end().to_string());
                }
                None => log::debug!("No command in log line {}: {}", idx + 1, line),
            }
            continue;
        }
        if line.starts_with("Recv") || line.trim().is_empty() {
            continue;
        }

        log::debug!("Terminal output ends at log line {}", idx + 1);
        break;
    }

    Ok(commands)
}
