//! Question sanitation.
//!
//! The request body is untrusted: it may be absent, non-JSON, or JSON
//! without the expected field. Sanitation never fails; the worst case is an
//! empty question, which still receives a complete reading downstream.

use serde_json::{Map, Value};

/// Maximum question length in characters.
pub const MAX_QUESTION_CHARS: usize = 200;

/// A bounded, trimmed user question.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Question(String);

impl Question {
    /// Extract and bound the question from a raw request body.
    ///
    /// Parse failures degrade to an empty object, missing or unusable
    /// `question` values to the empty string. Numbers and booleans are
    /// accepted and rendered; null, arrays and objects are not.
    pub fn sanitize(raw_body: &[u8]) -> Self {
        let body: Value =
            serde_json::from_slice(raw_body).unwrap_or_else(|_| Value::Object(Map::new()));

        let text = match body.get("question") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => String::new(),
        };

        let capped: String = text.chars().take(MAX_QUESTION_CHARS).collect();
        Question(capped.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_plain_question() {
        let q = Question::sanitize(br#"{"question": "Will it rain tomorrow?"}"#);
        assert_eq!(q.as_str(), "Will it rain tomorrow?");
    }

    #[test]
    fn test_sanitize_trims_whitespace() {
        let q = Question::sanitize(br#"{"question": "  lucky numbers?  "}"#);
        assert_eq!(q.as_str(), "lucky numbers?");
    }

    #[test]
    fn test_sanitize_truncates_to_200_chars() {
        let long = "x".repeat(500);
        let body = format!(r#"{{"question": "{}"}}"#, long);
        let q = Question::sanitize(body.as_bytes());
        assert_eq!(q.as_str().chars().count(), MAX_QUESTION_CHARS);
    }

    #[test]
    fn test_truncation_happens_before_trim() {
        // 199 chars then trailing spaces: the cap slices first, the trim
        // then removes whatever whitespace survived the cut.
        let body = format!(r#"{{"question": "{}{}"}}"#, "y".repeat(199), " ".repeat(10));
        let q = Question::sanitize(body.as_bytes());
        assert_eq!(q.as_str().chars().count(), 199);
    }

    #[test]
    fn test_sanitize_multibyte_question() {
        let long = "é".repeat(300);
        let body = format!(r#"{{"question": "{}"}}"#, long);
        let q = Question::sanitize(body.as_bytes());
        assert_eq!(q.as_str().chars().count(), MAX_QUESTION_CHARS);
    }

    #[test]
    fn test_sanitize_missing_field() {
        let q = Question::sanitize(br#"{"other": 1}"#);
        assert!(q.is_empty());
    }

    #[test]
    fn test_sanitize_non_json_body() {
        let q = Question::sanitize(b"%%% not json %%%");
        assert!(q.is_empty());
    }

    #[test]
    fn test_sanitize_empty_body() {
        let q = Question::sanitize(b"");
        assert!(q.is_empty());
    }

    #[test]
    fn test_sanitize_coerces_number() {
        let q = Question::sanitize(br#"{"question": 42}"#);
        assert_eq!(q.as_str(), "42");
    }

    #[test]
    fn test_sanitize_coerces_bool() {
        let q = Question::sanitize(br#"{"question": true}"#);
        assert_eq!(q.as_str(), "true");
    }

    #[test]
    fn test_sanitize_rejects_null_and_containers() {
        assert!(Question::sanitize(br#"{"question": null}"#).is_empty());
        assert!(Question::sanitize(br#"{"question": ["a"]}"#).is_empty());
        assert!(Question::sanitize(br#"{"question": {"a": 1}}"#).is_empty());
    }
}
