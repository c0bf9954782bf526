//! Input checks shared by the flows.

use qros_shared::{QrosError, Result};

/// Shortest question worth sending.
pub const QUESTION_MIN_CHARS: usize = 10;
/// Longest question accepted.
pub const QUESTION_MAX_CHARS: usize = 500;
/// Build logs shorter than this are treated as "nothing to analyze".
pub const BUILD_LOG_MIN_CHARS: usize = 10;
/// Shortest launch file accepted for debugging.
pub const LAUNCH_FILE_MIN_CHARS: usize = 20;
/// Shortest TF tree dump accepted for analysis.
pub const TF_TREE_MIN_CHARS: usize = 20;

/// Trim `input` and check its length in characters.
///
/// `what` names the input in the error message.
pub fn require_length<'a>(
    input: &'a str,
    what: &str,
    min: usize,
    max: Option<usize>,
) -> Result<&'a str> {
    let trimmed = input.trim();
    let len = trimmed.chars().count();

    if len < min {
        return Err(QrosError::validation(format!(
            "{what} is too short ({len} characters, need at least {min})"
        )));
    }
    if let Some(max) = max.filter(|max| len > *max) {
        return Err(QrosError::validation(format!(
            "{what} is too long ({len} characters, limit is {max})"
        )));
    }
    Ok(trimmed)
}
