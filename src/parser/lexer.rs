//! Line tokenizer.
//!
//! Splits a raw line into a command word and parameter words. Comments,
//! host line numbers (`N123`) and checksums (`*71`) never reach the parser.

/// Comment marker; everything after it is discarded
pub const COMMENT_MARKER: char = ';';

/// Words of a meaningful line, borrowed from the input
#[derive(Debug, Clone, PartialEq)]
pub struct Tokens<'a> {
    pub code: &'a str,
    pub params: Vec<&'a str>,
}

/// Tokenize one line. Returns `None` for blank and comment-only lines.
pub fn tokenize_line(line: &str) -> Option<Tokens<'_>> {
    let trimmed = line.trim();
    if trimmed.starts_with(COMMENT_MARKER) {
        return None;
    }

    let code = match trimmed.find(COMMENT_MARKER) {
        Some(idx) => &trimmed[..idx],
        None => trimmed,
    };
    let code = strip_checksum(code);

    let mut words = code.split_whitespace().peekable();
    if words.peek().is_some_and(|word| is_line_number(word)) {
        words.next();
    }

    let code = words.next()?;
    Some(Tokens {
        code,
        params: words.collect(),
    })
}

fn strip_checksum(text: &str) -> &str {
    match text.rfind('*') {
        Some(idx) => {
            let digits = text[idx + 1..].trim();
            if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
                &text[..idx]
            } else {
                text
            }
        }
        None => text,
    }
}

fn is_line_number(word: &str) -> bool {
    let mut chars = word.chars();
    matches!(chars.next(), Some('N' | 'n'))
        && word.len() > 1
        && chars.all(|c| c.is_ascii_digit())
}
