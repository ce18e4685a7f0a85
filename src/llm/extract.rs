//! Pull structured records out of free-form model output
//!
//! Models wrap JSON in markdown fences, lead with prose, or trail off with
//! commentary. Extraction tries, in order: the interior of the first fenced
//! block (or the whole text), a direct parse, then the first balanced `{...}`
//! span. Anything else is an `Extraction` error carrying the head of the raw
//! text.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{IdeaRalphError, Result};

/// Post-parse schema check for extracted records
pub trait Validate {
    fn validate(&self) -> std::result::Result<(), String>;
}

impl Validate for Value {
    fn validate(&self) -> std::result::Result<(), String> {
        Ok(())
    }
}

/// Interior of the first ``` fenced block, with any language tag dropped
fn fenced_interior(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let after = &text[open + 3..];

    // Skip a tag such as `json` when it sits directly after the fence
    let tag_len = after
        .char_indices()
        .find(|(_, c)| !c.is_ascii_alphanumeric())
        .map(|(i, _)| i)
        .unwrap_or(after.len());
    let body = &after[tag_len..];

    let close = body.find("```")?;
    Some(body[..close].trim())
}

/// Byte range of the first balanced `{...}` span starting at or after `from`
///
/// Braces inside JSON strings are ignored, as are escaped quotes.
fn balanced_span(text: &str, from: usize) -> Option<(usize, usize)> {
    let bytes = text.as_bytes();
    let start = from + text.get(from..)?.find('{')?;

    let mut depth: i32 = 0;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, &byte) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some((start, idx + 1));
                }
            }
            _ => {}
        }
    }
    None
}

/// First balanced `{...}` span in `text`, if any
#[cfg(test)]
fn first_balanced_object(text: &str) -> Option<&str> {
    balanced_span(text, 0).map(|(s, e)| &text[s..e])
}

/// Parse model output into a JSON object
pub fn extract_value(raw: &str) -> Result<Value> {
    let candidate = fenced_interior(raw).unwrap_or(raw).trim();

    if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(candidate) {
        return Ok(value);
    }

    let mut from = 0;
    while let Some((start, end)) = balanced_span(candidate, from) {
        if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(&candidate[start..end]) {
            return Ok(value);
        }
        from = start + 1;
    }

    Err(IdeaRalphError::extraction("no JSON object found in model response", raw))
}

/// Parse model output into `T` and check it against its schema
pub fn extract<T>(raw: &str) -> Result<T>
where
    T: DeserializeOwned + Validate,
{
    let value = extract_value(raw)?;
    let record: T = serde_json::from_value(value)
        .map_err(|e| IdeaRalphError::extraction(format!("response does not match schema: {}", e), raw))?;
    record
        .validate()
        .map_err(|msg| IdeaRalphError::extraction(msg, raw))?;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PmfScores;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    struct Verdict {
        dope_level: f64,
        feedback: String,
    }

    impl Validate for Verdict {
        fn validate(&self) -> std::result::Result<(), String> {
            if (0.0..=5.0).contains(&self.dope_level) {
                Ok(())
            } else {
                Err(format!("dopeLevel {} is outside [0, 5]", self.dope_level))
            }
        }
    }

    const BODY: &str = r#"{"dopeLevel": 3, "feedback": "paste-worthy"}"#;

    #[test]
    fn test_plain_object() {
        let v: Verdict = extract(BODY).unwrap();
        assert_eq!(v.dope_level, 3.0);
        assert_eq!(v.feedback, "paste-worthy");
    }

    #[test]
    fn test_fenced_and_bare_parse_identically() {
        let fenced = format!("```json\n{}\n```", BODY);
        let untagged = format!("```\n{}\n```", BODY);
        let bare: Verdict = extract(BODY).unwrap();
        assert_eq!(extract::<Verdict>(&fenced).unwrap(), bare);
        assert_eq!(extract::<Verdict>(&untagged).unwrap(), bare);
    }

    #[test]
    fn test_object_embedded_in_prose() {
        let raw = format!("Ralph says: here you go! {} Hope that helps.", BODY);
        let v: Verdict = extract(&raw).unwrap();
        assert_eq!(v.feedback, "paste-worthy");
    }

    #[test]
    fn test_braces_inside_strings_are_ignored() {
        let raw = r#"Sure: {"dopeLevel": 2, "feedback": "use {curly} braces and \"quotes\""} done"#;
        let v: Verdict = extract(raw).unwrap();
        assert_eq!(v.feedback, r#"use {curly} braces and "quotes""#);
    }

    #[test]
    fn test_skips_unparsable_leading_span() {
        let raw = format!("{{not json}} then {}", BODY);
        let v: Verdict = extract(&raw).unwrap();
        assert_eq!(v.dope_level, 3.0);
    }

    #[test]
    fn test_prose_only_fails_with_excerpt() {
        let raw = "I like turtles. ".repeat(40);
        let err = extract_value(&raw).unwrap_err();
        match err {
            IdeaRalphError::Extraction { excerpt, .. } => {
                assert_eq!(excerpt.chars().count(), crate::error::EXCERPT_LEN);
                assert!(raw.starts_with(&excerpt));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unbalanced_object_fails() {
        let err = extract_value(r#"{"dopeLevel": 3, "feedback": "oops""#).unwrap_err();
        assert!(matches!(err, IdeaRalphError::Extraction { .. }));
    }

    #[test]
    fn test_array_is_not_an_object() {
        assert!(extract_value("[1, 2, 3]").is_err());
    }

    #[test]
    fn test_missing_field_is_extraction_error() {
        let err = extract::<Verdict>(r#"{"dopeLevel": 3}"#).unwrap_err();
        assert!(matches!(err, IdeaRalphError::Extraction { .. }));
    }

    #[test]
    fn test_range_violation_is_extraction_error() {
        let err = extract::<Verdict>(r#"{"dopeLevel": 9, "feedback": "x"}"#).unwrap_err();
        match err {
            IdeaRalphError::Extraction { message, .. } => assert!(message.contains("outside")),
            other => panic!("unexpected error: {other:?}"),
        }

        let scores = r#"{"marketSize": 5, "problemSeverity": 5, "solutionFit": 5,
            "competition": 5, "vibeCodeable": 5, "virality": 12}"#;
        assert!(matches!(
            extract::<PmfScores>(scores).unwrap_err(),
            IdeaRalphError::Extraction { .. }
        ));
    }

    #[test]
    fn test_fenced_interior() {
        assert_eq!(fenced_interior("a ```json\n{}\n``` b"), Some("{}"));
        assert_eq!(fenced_interior("no fence"), None);
        assert_eq!(fenced_interior("```json\n{} unterminated"), None);
    }

    #[test]
    fn test_first_balanced_object() {
        assert_eq!(first_balanced_object(r#"x {"a": {"b": 1}} y"#), Some(r#"{"a": {"b": 1}}"#));
        assert_eq!(first_balanced_object("no braces"), None);
    }
}
