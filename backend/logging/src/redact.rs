//! Log Redaction Layer
//!
//! Model output describes identity documents, so raw completions are scrubbed
//! of document/card numbers, phone numbers and tokens before they reach logs.

use regex::Regex;
use std::sync::LazyLock;

static DOC_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b[A-Z]{0,2}\d{8,19}\b").unwrap());
static TELEPHONE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?:\+?\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}").unwrap());
static API_KEY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(sk-[a-zA-Z0-9]{32,})|(Bearer\s+[a-zA-Z0-9\-\._~+/]+=*)").unwrap());

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let mut redacted = DOC_NUMBER_RE.replace_all(input, "[REDACTED_NUMBER]").to_string();
    redacted = TELEPHONE_RE.replace_all(&redacted, "[REDACTED_PHONE]").to_string();
    redacted = API_KEY_RE.replace_all(&redacted, "[REDACTED_TOKEN]").to_string();
    redacted
}

/// First `max_chars` characters of `text`, with `...` appended when cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redaction() {
        let raw = "Sending to +1-555-123-4567 with Bearer eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9";
        let clean = redact_sensitive_data(raw);
        assert!(!clean.contains("+1-555-123-4567"));
        assert!(!clean.contains("Bearer eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9"));
    }

    #[test]
    fn redacts_passport_and_card_numbers() {
        let raw = r#"{"passportNumber": "X12345678", "card": "4111111111111111", "name": "John"}"#;
        let clean = redact_sensitive_data(raw);
        assert!(!clean.contains("12345678"));
        assert!(!clean.contains("4111111111111111"));
        assert!(clean.contains("John"));
    }

    #[test]
    fn preview_cuts_on_char_boundary() {
        assert_eq!(preview("short", 200), "short");
        assert_eq!(preview("abcdef", 3), "abc...");
        assert_eq!(preview("ééé", 2), "éé...");
    }
}
