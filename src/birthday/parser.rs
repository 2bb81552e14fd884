use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::models::Intent;

static MENTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@(\w+)").expect("static regex compile"));

const TEST_FLAGS: &[&str] = &["--test", "-t"];

/// Flags may be glued to mentions by list punctuation (`@leem,-t`, `(-t)`).
fn is_token_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, ',' | ';' | '(' | ')')
}

/// Whole-token, case-insensitive flag match, so `@sam-t` never counts.
fn is_test_flag(token: &str) -> bool {
    TEST_FLAGS.contains(&token.to_lowercase().as_str())
}

/// Parse the raw command text into an [`Intent`].
///
/// An empty recipient list means the command is unusable; callers reject it.
#[must_use]
pub fn parse_command(text: &str) -> Intent {
    let is_test_mode = text
        .split(is_token_separator)
        .filter(|t| !t.is_empty())
        .any(is_test_flag);

    Intent {
        is_test_mode,
        recipients: parse_recipients(text),
    }
}

/// `@name` mentions in order of appearance, `@` stripped, duplicates kept.
#[must_use]
pub fn parse_recipients(text: &str) -> Vec<String> {
    MENTION_RE
        .captures_iter(text)
        .map(|cap| cap[1].to_string())
        .collect()
}
