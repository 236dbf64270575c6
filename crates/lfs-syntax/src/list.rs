//! Syntax for comma-delimited string list fields.

use crate::syntax::{check_scalar_markers, FieldSyntax};
use lfs_common::markers::REDACTED_MARKER;
use lfs_common::{sanitize_string, tokenize, Result};

/// Log field syntax for comma-delimited string lists.
///
/// The list itself is the only addressable structure: component-level
/// redaction and tokenization transform each element independently and
/// re-join with `,`. Parsing trims whitespace around elements but never
/// collapses adjacent empty fields (`"a,,b"` parses to three elements,
/// the middle one empty).
#[derive(Debug, Clone)]
pub struct CommaDelimitedListSyntax {
    max_string_length: usize,
}

impl CommaDelimitedListSyntax {
    /// Create a comma-delimited list syntax.
    pub fn new(max_string_length: usize) -> Self {
        Self { max_string_length }
    }
}

impl FieldSyntax for CommaDelimitedListSyntax {
    type Value = Vec<String>;

    fn syntax_name(&self) -> &'static str {
        "comma-delimited-string-list"
    }

    fn max_string_length(&self) -> usize {
        self.max_string_length
    }

    fn value_to_sanitized_string(&self, value: &Vec<String>) -> String {
        let mut out = String::new();
        for (i, element) in value.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(&sanitize_string(element, self.max_string_length));
        }
        out
    }

    fn parse_value(&self, s: &str) -> Result<Vec<String>> {
        check_scalar_markers(s)?;
        Ok(s.split(',').map(|e| e.trim().to_string()).collect())
    }

    fn redact_entire_value(&self) -> &'static str {
        REDACTED_MARKER
    }

    fn completely_redacted_value_conforms_to_syntax(&self) -> bool {
        // A single-element list whose element is the marker.
        true
    }

    fn supports_redacted_components(&self) -> bool {
        true
    }

    fn redact_components(&self, value: &Vec<String>) -> String {
        let mut out = String::with_capacity(value.len() * (REDACTED_MARKER.len() + 1));
        for i in 0..value.len() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(REDACTED_MARKER);
        }
        out
    }

    fn tokenize_entire_value(&self, value: &Vec<String>, pepper: &[u8]) -> String {
        tokenize(value.join(",").as_bytes(), pepper)
    }

    fn completely_tokenized_value_conforms_to_syntax(&self) -> bool {
        true
    }

    fn supports_tokenized_components(&self) -> bool {
        true
    }

    fn tokenize_components(&self, value: &Vec<String>, pepper: &[u8]) -> String {
        let mut out = String::new();
        for (i, element) in value.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(&tokenize(element.as_bytes(), pepper));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lfs_common::SyntaxError;

    fn syntax() -> CommaDelimitedListSyntax {
        CommaDelimitedListSyntax::new(100)
    }

    #[test]
    fn test_parse_trims_element_whitespace() {
        assert_eq!(
            syntax().parse_value("test1 , test2 , test3").unwrap(),
            vec!["test1", "test2", "test3"]
        );
    }

    #[test]
    fn test_parse_preserves_empty_fields() {
        assert_eq!(syntax().parse_value("a,,b").unwrap(), vec!["a", "", "b"]);
    }

    #[test]
    fn test_sanitize_truncates_each_element() {
        let syntax = CommaDelimitedListSyntax::new(4);
        assert_eq!(
            syntax.value_to_sanitized_string(&vec![
                "abc".to_string(),
                "abcdefgh".to_string()
            ]),
            "abc,abcd{4 more characters}"
        );
    }

    #[test]
    fn test_roundtrip_without_truncation() {
        let value = vec!["test1".to_string(), "test2".to_string()];
        let rendered = syntax().value_to_sanitized_string(&value);
        assert_eq!(syntax().parse_value(&rendered).unwrap(), value);
    }

    #[test]
    fn test_redact_components_preserves_count() {
        let value = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let redacted = syntax().redact_components(&value);
        assert_eq!(redacted, "{REDACTED},{REDACTED},{REDACTED}");
        assert!(syntax().value_string_includes_redacted_component(&redacted));
    }

    #[test]
    fn test_tokenize_components_preserves_count_and_correlation() {
        let value = vec!["a".to_string(), "b".to_string(), "a".to_string()];
        let tokenized = syntax().tokenize_components(&value, b"pepper");
        let elements = syntax().parse_value(&tokenized).unwrap();
        assert_eq!(elements.len(), 3);
        assert_eq!(elements[0], elements[2]);
        assert_ne!(elements[0], elements[1]);
    }

    #[test]
    fn test_parse_marker_outcomes() {
        assert_eq!(
            syntax().parse_value("{REDACTED}"),
            Err(SyntaxError::RedactedValue)
        );
        let token = syntax().tokenize_entire_value(&vec!["x".to_string()], b"p");
        assert_eq!(syntax().parse_value(&token), Err(SyntaxError::TokenizedValue));
    }
}
