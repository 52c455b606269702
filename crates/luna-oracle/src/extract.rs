//! Pull a JSON object out of free-form model output
//!
//! Two pure steps: strip a surrounding markdown fence, then slice from the
//! first `{` to the last `}` and hand that span to the JSON parser.

use crate::error::ExtractionError;
use luna_domain::ResultRecord;
use serde_json::{Map, Value};
use tracing::debug;

const FENCE: &str = "```";

/// Characters allowed in a fence language tag (`json`, `json5`, `c++`, ...)
fn is_tag_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '.' | '-')
}

/// Remove a leading fence (with any language tag) and a trailing fence.
///
/// The text is trimmed before and after. Fences in the middle of the text
/// are left alone; the brace scan skips over them anyway.
///
/// ```
/// use luna_oracle::strip_fences;
///
/// assert_eq!(strip_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
/// assert_eq!(strip_fences("  ```\n{}\n```  "), "{}");
/// assert_eq!(strip_fences("{}"), "{}");
/// ```
pub fn strip_fences(text: &str) -> &str {
    let mut body = text.trim();

    if let Some(rest) = body.strip_prefix(FENCE) {
        let tag_len = rest.find(|c: char| !is_tag_char(c)).unwrap_or(rest.len());
        body = &rest[tag_len..];
    }

    if let Some(rest) = body.trim_end().strip_suffix(FENCE) {
        body = rest;
    }

    body.trim()
}

/// The widest brace span: first `{` through last `}`, inclusive.
///
/// Returns `None` when either brace is missing or they are out of order.
///
/// ```
/// use luna_oracle::brace_span;
///
/// assert_eq!(brace_span("Sure! {\"a\": {\"b\": 1}} Enjoy."), Some("{\"a\": {\"b\": 1}}"));
/// assert_eq!(brace_span("{\"x\":1} {\"y\":2}"), Some("{\"x\":1} {\"y\":2}"));
/// assert_eq!(brace_span("} nothing {"), None);
/// ```
pub fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// Extract a reading from raw model output.
///
/// Trims, strips a markdown fence, takes the widest brace span and parses it
/// as a JSON object. Keys are not checked; whatever the model produced is
/// returned. When the text holds two separate objects, the span covers both
/// and parsing fails.
///
/// ```
/// use luna_oracle::extract;
///
/// let raw = "Here you go:\n```json\n{\"summary\":\"good day\",\"advice\":\"smile\"}\n```\nHope that helps!";
/// let record = extract(raw).unwrap();
/// assert_eq!(record.text("summary").as_deref(), Some("good day"));
/// assert_eq!(record.text("advice").as_deref(), Some("smile"));
///
/// assert!(extract("no json here").is_err());
/// ```
pub fn extract(raw: &str) -> Result<ResultRecord, ExtractionError> {
    let body = strip_fences(raw);

    let Some(span) = brace_span(body) else {
        debug!(raw_len = raw.len(), "No brace span in model response");
        return Err(ExtractionError::NoJsonObject {
            raw: raw.to_string(),
        });
    };

    let fields: Map<String, Value> =
        serde_json::from_str(span).map_err(|source| ExtractionError::Parse {
            source,
            raw: raw.to_string(),
        })?;

    debug!(keys = fields.len(), "Extracted reading");
    Ok(ResultRecord::new(fields))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> ResultRecord {
        serde_json::from_str(s).unwrap()
    }

    #[test]
    fn test_clean_json() {
        let s = r#"{"summary": "ok", "advice": "rest"}"#;
        assert_eq!(extract(s).unwrap(), parse(s));
    }

    #[test]
    fn test_fenced_json() {
        let s = r#"{"summary": "ok"}"#;
        let raw = format!("```json\n{}\n```", s);
        assert_eq!(extract(&raw).unwrap(), parse(s));
    }

    #[test]
    fn test_fence_without_language_tag() {
        let raw = "```\n{\"summary\": \"ok\"}\n```";
        assert_eq!(extract(raw).unwrap().text_or_empty("summary"), "ok");
    }

    #[test]
    fn test_fence_with_other_tag() {
        let raw = "```javascript\n{\"summary\": \"ok\"}\n```";
        assert_eq!(extract(raw).unwrap().text_or_empty("summary"), "ok");
    }

    #[test]
    fn test_fence_tag_glued_to_object() {
        let raw = "```json{\"summary\": \"ok\"}```";
        assert_eq!(strip_fences(raw), "{\"summary\": \"ok\"}");
        assert_eq!(extract(raw).unwrap().text_or_empty("summary"), "ok");
    }

    #[test]
    fn test_leading_and_trailing_prose() {
        let raw = "Here you go:\n```json\n{\"summary\":\"good day\",\"advice\":\"smile\"}\n```\nHope that helps!";
        let record = extract(raw).unwrap();
        assert_eq!(record, parse(r#"{"summary":"good day","advice":"smile"}"#));
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_surrounding_whitespace() {
        let raw = "\n\n   {\"summary\": \"ok\"}   \n\t";
        assert_eq!(extract(raw).unwrap().text_or_empty("summary"), "ok");
    }

    #[test]
    fn test_braces_inside_string_values() {
        let raw = r#"Reading: {"summary": "a {curly} day", "advice": "close the }"} bye"#;
        let record = extract(raw).unwrap();
        assert_eq!(record.text_or_empty("summary"), "a {curly} day");
        assert_eq!(record.text_or_empty("advice"), "close the }");
    }

    #[test]
    fn test_nested_objects() {
        let raw = r#"{"summary": "ok", "details": {"color": "blue"}}"#;
        let record = extract(raw).unwrap();
        assert_eq!(record.text_or_empty("details"), r#"{"color":"blue"}"#);
    }

    #[test]
    fn test_no_json() {
        let err = extract("no json here").unwrap_err();
        assert!(matches!(err, ExtractionError::NoJsonObject { .. }));
        assert_eq!(err.raw(), "no json here");
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(
            extract(""),
            Err(ExtractionError::NoJsonObject { .. })
        ));
        assert!(matches!(
            extract("```json\n```"),
            Err(ExtractionError::NoJsonObject { .. })
        ));
    }

    #[test]
    fn test_only_opening_brace() {
        assert!(matches!(
            extract("{ \"summary\": \"cut off"),
            Err(ExtractionError::NoJsonObject { .. })
        ));
    }

    #[test]
    fn test_braces_out_of_order() {
        assert!(matches!(
            extract("} then {"),
            Err(ExtractionError::NoJsonObject { .. })
        ));
    }

    #[test]
    fn test_invalid_json() {
        let err = extract("{ invalid json , }").unwrap_err();
        match err {
            ExtractionError::Parse { raw, .. } => assert_eq!(raw, "{ invalid json , }"),
            other => panic!("Expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_trailing_comma_fails() {
        assert!(matches!(
            extract(r#"{"summary": "ok",}"#),
            Err(ExtractionError::Parse { .. })
        ));
    }

    #[test]
    fn test_truncated_output_fails() {
        // Last brace belongs to the inner object; outer object never closes
        let raw = r#"{"summary": "ok", "details": {"a": "b"}"#;
        assert!(matches!(extract(raw), Err(ExtractionError::Parse { .. })));
    }

    #[test]
    fn test_two_objects_use_widest_span() {
        let raw = r#"{"summary":"ok"} {"summary":"overwritten"}"#;
        assert_eq!(brace_span(raw), Some(raw));
        // The span holds two top-level objects, which is not one JSON value
        let err = extract(raw).unwrap_err();
        assert!(matches!(err, ExtractionError::Parse { .. }));
        assert_eq!(err.raw(), raw);
    }

    #[test]
    fn test_parse_error_keeps_original_raw_text() {
        let raw = "```json\n{ broken }\n```";
        let err = extract(raw).unwrap_err();
        assert_eq!(err.raw(), raw);
    }

    #[test]
    fn test_empty_object() {
        assert!(extract("{}").unwrap().is_empty());
    }

    #[test]
    fn test_strip_fences_leaves_inner_fences() {
        let raw = "Intro\n```json\n{}\n```";
        // Only a trailing fence is removed when the text doesn't start with one
        assert_eq!(strip_fences(raw), "Intro\n```json\n{}");
    }
}
