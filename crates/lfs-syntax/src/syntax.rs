//! The common contract every concrete field syntax implements.
//!
//! A field syntax converts typed values into one of three safe textual
//! representations for logging:
//!
//! - **sanitized** — length-bounded but information-preserving
//! - **redacted** — privacy-destroying, shape-preserving
//! - **tokenized** — privacy-preserving, shape-preserving, keyed
//!   pseudonymization
//!
//! and parses any of the three back, distinguishing "deliberately
//! redacted", "deliberately tokenized", and "corrupt" as three different
//! outcomes.
//!
//! Implementations are immutable and all operations are pure, so one
//! syntax instance may be shared freely across logging threads.

use lfs_common::markers::{
    includes_redacted_component, includes_tokenized_component, is_complete_tokenized_marker,
    REDACTED_MARKER,
};
use lfs_common::{JsonLogBuffer, Result, SyntaxError, TextLogBuffer};
use tracing::trace;

/// A syntax for one log field data type.
pub trait FieldSyntax {
    /// The typed value this syntax renders and parses.
    type Value;

    /// The name of this syntax, for diagnostics.
    fn syntax_name(&self) -> &'static str;

    /// Maximum number of characters any single string leaf may occupy in
    /// sanitized output before truncation applies.
    fn max_string_length(&self) -> usize;

    /// Render a human-readable form of the value with every scalar string
    /// leaf individually truncated to the configured maximum. Never
    /// removes information beyond truncation; always succeeds.
    fn value_to_sanitized_string(&self, value: &Self::Value) -> String;

    /// Parse a stored log string back into a typed value, or report why
    /// it cannot be recovered. Exactly one outcome is produced; a string
    /// that only partially resembles a marker parses as plain data.
    fn parse_value(&self, s: &str) -> Result<Self::Value>;

    /// NoThrow variant of [`parse_value`](Self::parse_value): best-effort
    /// extraction that treats every failure as an absent value, for
    /// scanning large log files where one malformed field should not
    /// abort analysis of the rest of the line.
    fn parse_value_opt(&self, s: &str) -> Option<Self::Value> {
        self.parse_value(s).ok()
    }

    /// The canonical whole-value redaction literal for this syntax.
    /// Fixed, not a function of the input.
    fn redact_entire_value(&self) -> &'static str;

    /// Whether [`redact_entire_value`](Self::redact_entire_value) is
    /// itself accepted by this syntax's own grammar as a well-formed (if
    /// meaningless) value.
    fn completely_redacted_value_conforms_to_syntax(&self) -> bool;

    /// Whether this syntax supports structure-preserving component-level
    /// redaction.
    fn supports_redacted_components(&self) -> bool {
        false
    }

    /// Redact the sensitive components of a value while preserving its
    /// structure. Syntaxes without addressable components fall back to
    /// whole-value redaction.
    fn redact_components(&self, value: &Self::Value) -> String {
        let _ = value;
        self.redact_entire_value().to_string()
    }

    /// Whether [`redact_components`](Self::redact_components) output
    /// re-parses under this syntax's grammar.
    fn redacted_components_conform_to_syntax(&self) -> bool {
        self.completely_redacted_value_conforms_to_syntax()
    }

    /// Replace the entire value with a deterministic keyed token. The
    /// pepper is borrowed for this call only and never retained.
    fn tokenize_entire_value(&self, value: &Self::Value, pepper: &[u8]) -> String;

    /// Whether whole-value tokenization output is accepted by this
    /// syntax's own grammar.
    fn completely_tokenized_value_conforms_to_syntax(&self) -> bool;

    /// Whether this syntax supports structure-preserving component-level
    /// tokenization.
    fn supports_tokenized_components(&self) -> bool {
        false
    }

    /// Tokenize the sensitive components of a value while preserving its
    /// structure. Syntaxes without addressable components fall back to
    /// whole-value tokenization.
    fn tokenize_components(&self, value: &Self::Value, pepper: &[u8]) -> String {
        self.tokenize_entire_value(value, pepper)
    }

    /// Whether [`tokenize_components`](Self::tokenize_components) output
    /// re-parses under this syntax's grammar.
    fn tokenized_components_conform_to_syntax(&self) -> bool {
        self.completely_tokenized_value_conforms_to_syntax()
    }

    // ------------------------------------------------------------------
    // Marker inspection. Pure string checks, no parsing.
    // ------------------------------------------------------------------

    /// Whether the string is a recognized whole-value redaction form for
    /// this syntax.
    fn value_string_is_completely_redacted(&self, s: &str) -> bool {
        s == REDACTED_MARKER || s == self.redact_entire_value()
    }

    /// Whether the string contains a redaction marker anywhere.
    fn value_string_includes_redacted_component(&self, s: &str) -> bool {
        includes_redacted_component(s)
    }

    /// Whether the string is a recognized whole-value tokenization form
    /// for this syntax.
    fn value_string_is_completely_tokenized(&self, s: &str) -> bool {
        is_complete_tokenized_marker(s)
    }

    /// Whether the string contains a tokenization marker anywhere.
    fn value_string_includes_tokenized_component(&self, s: &str) -> bool {
        includes_tokenized_component(s)
    }

    // ------------------------------------------------------------------
    // Emission adapters. These write straight into the caller's log
    // buffer; they sit on the per-field logging hot path.
    // ------------------------------------------------------------------

    /// Write ` name="<sanitized>"` into a text-formatted log buffer.
    fn log_sanitized_field_to_text(
        &self,
        field_name: &str,
        value: &Self::Value,
        buf: &mut TextLogBuffer,
    ) {
        buf.append_field(field_name, &self.value_to_sanitized_string(value));
    }

    /// Write `"name":"<sanitized>"` into a JSON-formatted log buffer.
    fn log_sanitized_field_to_json(
        &self,
        field_name: &str,
        value: &Self::Value,
        buf: &mut JsonLogBuffer,
    ) {
        buf.append_string_field(field_name, &self.value_to_sanitized_string(value));
    }

    /// Write the sanitized value alone into a JSON buffer, for emission
    /// inside JSON arrays.
    fn log_sanitized_value_to_json(&self, value: &Self::Value, buf: &mut JsonLogBuffer) {
        buf.append_string_value(&self.value_to_sanitized_string(value));
    }

    /// Write a completely redacted field into a text buffer.
    fn log_completely_redacted_field_to_text(&self, field_name: &str, buf: &mut TextLogBuffer) {
        buf.append_field(field_name, self.redact_entire_value());
    }

    /// Write a completely redacted field into a JSON buffer.
    fn log_completely_redacted_field_to_json(&self, field_name: &str, buf: &mut JsonLogBuffer) {
        buf.append_string_field(field_name, self.redact_entire_value());
    }

    /// Write the whole-value redaction literal alone into a JSON buffer.
    fn log_completely_redacted_value_to_json(&self, buf: &mut JsonLogBuffer) {
        buf.append_string_value(self.redact_entire_value());
    }

    /// Write a component-redacted field into a text buffer.
    fn log_redacted_components_field_to_text(
        &self,
        field_name: &str,
        value: &Self::Value,
        buf: &mut TextLogBuffer,
    ) {
        buf.append_field(field_name, &self.redact_components(value));
    }

    /// Write a component-redacted field into a JSON buffer.
    fn log_redacted_components_field_to_json(
        &self,
        field_name: &str,
        value: &Self::Value,
        buf: &mut JsonLogBuffer,
    ) {
        buf.append_string_field(field_name, &self.redact_components(value));
    }

    /// Write the component-redacted value alone into a JSON buffer.
    fn log_redacted_components_value_to_json(&self, value: &Self::Value, buf: &mut JsonLogBuffer) {
        buf.append_string_value(&self.redact_components(value));
    }

    /// Write a completely tokenized field into a text buffer.
    fn log_completely_tokenized_field_to_text(
        &self,
        field_name: &str,
        value: &Self::Value,
        pepper: &[u8],
        buf: &mut TextLogBuffer,
    ) {
        buf.append_field(field_name, &self.tokenize_entire_value(value, pepper));
    }

    /// Write a completely tokenized field into a JSON buffer.
    fn log_completely_tokenized_field_to_json(
        &self,
        field_name: &str,
        value: &Self::Value,
        pepper: &[u8],
        buf: &mut JsonLogBuffer,
    ) {
        buf.append_string_field(field_name, &self.tokenize_entire_value(value, pepper));
    }

    /// Write the whole-value token alone into a JSON buffer.
    fn log_completely_tokenized_value_to_json(
        &self,
        value: &Self::Value,
        pepper: &[u8],
        buf: &mut JsonLogBuffer,
    ) {
        buf.append_string_value(&self.tokenize_entire_value(value, pepper));
    }

    /// Write a component-tokenized field into a text buffer.
    fn log_tokenized_components_field_to_text(
        &self,
        field_name: &str,
        value: &Self::Value,
        pepper: &[u8],
        buf: &mut TextLogBuffer,
    ) {
        buf.append_field(field_name, &self.tokenize_components(value, pepper));
    }

    /// Write a component-tokenized field into a JSON buffer.
    fn log_tokenized_components_field_to_json(
        &self,
        field_name: &str,
        value: &Self::Value,
        pepper: &[u8],
        buf: &mut JsonLogBuffer,
    ) {
        buf.append_string_field(field_name, &self.tokenize_components(value, pepper));
    }

    /// Write the component-tokenized value alone into a JSON buffer.
    fn log_tokenized_components_value_to_json(
        &self,
        value: &Self::Value,
        pepper: &[u8],
        buf: &mut JsonLogBuffer,
    ) {
        buf.append_string_value(&self.tokenize_components(value, pepper));
    }
}

/// Classify a string against the scalar whole-value markers. Shared by
/// every syntax whose full-redaction and full-tokenization forms are the
/// bare `{REDACTED}` / `{TOKENIZED:...}` literals.
pub(crate) fn check_scalar_markers(s: &str) -> Result<()> {
    if s == REDACTED_MARKER {
        trace!("value string is a complete redaction marker");
        return Err(SyntaxError::RedactedValue);
    }
    if is_complete_tokenized_marker(s) {
        trace!("value string is a complete tokenization marker");
        return Err(SyntaxError::TokenizedValue);
    }
    Ok(())
}
