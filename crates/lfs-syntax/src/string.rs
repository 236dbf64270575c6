//! Syntax for free-form string fields.

use crate::syntax::{check_scalar_markers, FieldSyntax};
use lfs_common::markers::REDACTED_MARKER;
use lfs_common::{sanitize_into, sanitize_string, tokenize, Result, TextLogBuffer};

/// Log field syntax for plain string values. Whole-value redaction and
/// tokenization only: a free-form string has no addressable components.
#[derive(Debug, Clone)]
pub struct StringSyntax {
    max_string_length: usize,
}

impl StringSyntax {
    /// Create a string syntax with the given per-leaf truncation limit.
    pub fn new(max_string_length: usize) -> Self {
        Self { max_string_length }
    }
}

impl FieldSyntax for StringSyntax {
    type Value = String;

    fn syntax_name(&self) -> &'static str {
        "string"
    }

    fn max_string_length(&self) -> usize {
        self.max_string_length
    }

    fn value_to_sanitized_string(&self, value: &String) -> String {
        sanitize_string(value, self.max_string_length)
    }

    fn parse_value(&self, s: &str) -> Result<String> {
        check_scalar_markers(s)?;
        Ok(s.to_string())
    }

    fn redact_entire_value(&self) -> &'static str {
        REDACTED_MARKER
    }

    fn completely_redacted_value_conforms_to_syntax(&self) -> bool {
        true
    }

    fn tokenize_entire_value(&self, value: &String, pepper: &[u8]) -> String {
        tokenize(value.as_bytes(), pepper)
    }

    fn completely_tokenized_value_conforms_to_syntax(&self) -> bool {
        true
    }

    // Stream the truncated value straight into the buffer; the sanitized
    // form of a large string would otherwise be allocated twice per call.
    fn log_sanitized_field_to_text(
        &self,
        field_name: &str,
        value: &String,
        buf: &mut TextLogBuffer,
    ) {
        let inner = buf.begin_field(field_name);
        sanitize_into(inner, value, self.max_string_length);
        buf.end_field();
    }
}
