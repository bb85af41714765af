//! Locating the resume point in the original program.

use thiserror::Error;

use crate::parser::lexer::COMMENT_MARKER;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LocateError {
    #[error("the log contains no sent commands")]
    NoSentCommands,

    #[error("the last {window} sent commands (starting with '{first}') do not appear in the program")]
    NotFound { window: usize, first: String },
}

/// Find the 0-based index of the first program line that was never sent.
///
/// The last `window` sent G commands (fewer if the log is shorter) must appear
/// as consecutive G commands in the program. Everything else on the program
/// side (comments, blank lines, M commands) is passed over, since none of it
/// shows up among the sent commands. The first occurrence wins.
pub fn locate_resume_line<S: AsRef<str>>(
    program: &[S],
    sent: &[String],
    window: usize,
) -> Result<usize, LocateError> {
    let window = window.clamp(1, sent.len().max(1));
    let needle = sent
        .get(sent.len().saturating_sub(window)..)
        .filter(|needle| !needle.is_empty())
        .ok_or(LocateError::NoSentCommands)?;

    let commands: Vec<(usize, &str)> = program
        .iter()
        .enumerate()
        .map(|(idx, line)| (idx, strip_comment(line.as_ref())))
        .filter(|(_, command)| command.starts_with(['G', 'g']))
        .collect();

    commands
        .windows(needle.len())
        .find(|candidate| {
            candidate
                .iter()
                .zip(needle)
                .all(|((_, command), sent)| *command == sent.trim())
        })
        .and_then(|matched| matched.last())
        .map(|(idx, _)| idx + 1)
        .ok_or_else(|| LocateError::NotFound {
            window: needle.len(),
            first: needle[0].clone(),
        })
}

fn strip_comment(line: &str) -> &str {
    match line.find(COMMENT_MARKER) {
        Some(idx) => line[..idx].trim(),
        None => line.trim(),
    }
}
