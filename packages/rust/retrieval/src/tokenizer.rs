//! Query tokenization and case folding.
//!
//! Folding is done per character so a folded string always has the same
//! number of chars as its source. Excerpt offsets found in folded text can
//! then be applied to the original text directly.

use std::sync::LazyLock;

use regex::Regex;

/// Any run of characters that is not a letter, combining mark or digit.
static SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{M}\p{N}]+").expect("valid regex"));

/// Lowercase a single char, keeping it unchanged when its lowercase form
/// expands to more than one char.
fn fold_char(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

/// Lowercase `text` one char at a time (char count preserved).
pub fn fold_case(text: &str) -> String {
    text.chars().map(fold_char).collect()
}

/// Split a query into lowercase word tokens.
///
/// Duplicates are kept in order; empty tokens are dropped.
pub fn tokenize(query: &str) -> Vec<String> {
    let folded = fold_case(query);
    SEPARATOR_RE
        .split(&folded)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .collect()
}
