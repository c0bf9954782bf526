//! Lenient parsing of JSON replies from the completion service.
//!
//! Models asked for JSON still wrap it in Markdown fences or add a sentence
//! around it. We strip a surrounding fence, cut from the first `{`/`[` to
//! the matching last `}`/`]`, and hand that to serde.

use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;

use qros_shared::{QrosError, Result};

/// A reply that is entirely one fenced block, e.g. ```` ```json ... ``` ````.
static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\s*```[A-Za-z0-9_-]*[ \t]*\r?\n(.*?)\r?\n?\s*```\s*$").expect("valid regex")
});

/// Characters of the raw reply quoted in parse errors.
const PREVIEW_CHARS: usize = 120;

/// Deserialize the JSON value embedded in a model reply.
pub fn parse_structured<T: DeserializeOwned>(raw: &str) -> Result<T> {
    let body = strip_fence(raw);
    let candidate = json_span(body).unwrap_or(body);

    serde_json::from_str(candidate).map_err(|e| {
        QrosError::parse(format!(
            "malformed model response ({e}); reply began with: {:?}",
            preview(raw)
        ))
    })
}

fn strip_fence(raw: &str) -> &str {
    FENCE_RE
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map_or(raw.trim(), |m| m.as_str().trim())
}

/// The slice from the first opening bracket to the last matching closer.
fn json_span(text: &str) -> Option<&str> {
    let start = text.find(['{', '['])?;
    let closer = if text[start..].starts_with('{') { '}' } else { ']' };
    let end = text.rfind(closer)?;
    (end > start).then(|| &text[start..=end])
}

fn preview(raw: &str) -> String {
    raw.trim().chars().take(PREVIEW_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Payload {
        answer: String,
    }

    #[test]
    fn plain_json() {
        let p: Payload = parse_structured(r#"{"answer":"yes"}"#).unwrap();
        assert_eq!(p.answer, "yes");
    }

    #[test]
    fn fenced_json() {
        let raw = "```json\n{\"answer\": \"fenced\"}\n```";
        let p: Payload = parse_structured(raw).unwrap();
        assert_eq!(p.answer, "fenced");
    }

    #[test]
    fn json_with_surrounding_prose() {
        let raw = "Sure! Here is the result:\n{\"answer\": \"wrapped\"}\nHope this helps.";
        let p: Payload = parse_structured(raw).unwrap();
        assert_eq!(p.answer, "wrapped");
    }

    #[test]
    fn bare_array() {
        let raw = "```\n[{\"answer\":\"a\"},{\"answer\":\"b\"}]\n```";
        let items: Vec<Payload> = parse_structured(raw).unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn braces_inside_strings_survive() {
        let raw = r#"{"answer":"use `{}` placeholders"}"#;
        let p: Payload = parse_structured(raw).unwrap();
        assert_eq!(p.answer, "use `{}` placeholders");
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let err = parse_structured::<Payload>("I cannot help with that.").unwrap_err();
        assert!(matches!(err, QrosError::Parse { .. }));
        assert!(err.to_string().contains("I cannot help"));
    }

    #[test]
    fn wrong_shape_is_a_parse_error() {
        let err = parse_structured::<Payload>(r#"{"reply":"x"}"#).unwrap_err();
        assert!(err.to_string().contains("answer"));
    }
}
