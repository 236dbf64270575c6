//! Syntax for JSON document fields.

use crate::syntax::FieldSyntax;
use lfs_common::markers::{is_complete_tokenized_marker, REDACTED_MARKER};
use lfs_common::{sanitize_string, tokenize, JsonLogBuffer, Result, SensitivityPolicy, SyntaxError};
use serde_json::Value;
use tracing::trace;

/// Whole-value redaction form: a synthetic one-field object, so the
/// output is still a syntactically valid JSON document.
const REDACTED_JSON: &str = "{\"redacted\":\"{REDACTED}\"}";

/// Log field syntax for JSON documents with recursive field-level
/// redaction and tokenization.
///
/// Sensitivity is keyed by exact field name, with no case folding and no
/// schema aliasing. A sensitive field's entire value is replaced with the
/// marker as a string, whatever its shape; the walk never recurses inside
/// a replaced value. Scalar array elements carry no field name and are
/// never individually replaced.
#[derive(Debug, Clone)]
pub struct JsonSyntax {
    max_string_length: usize,
    policy: SensitivityPolicy,
}

impl JsonSyntax {
    /// Create a JSON syntax with the given truncation limit and
    /// field-name sensitivity policy.
    pub fn new(max_string_length: usize, policy: SensitivityPolicy) -> Self {
        Self {
            max_string_length,
            policy,
        }
    }

    fn sanitize_value(&self, value: &Value) -> Value {
        match value {
            Value::String(s) => Value::String(sanitize_string(s, self.max_string_length)),
            Value::Array(items) => {
                Value::Array(items.iter().map(|i| self.sanitize_value(i)).collect())
            }
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), self.sanitize_value(v)))
                    .collect(),
            ),
            other => other.clone(),
        }
    }

    /// Walk a document replacing the whole value of every sensitive field
    /// with `replace(value)`, recursing into non-sensitive containers.
    fn protect_value(&self, value: &Value, replace: &impl Fn(&Value) -> Value) -> Value {
        match value {
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| {
                        if self.policy.is_name_sensitive(Some(k)) {
                            (k.clone(), replace(v))
                        } else {
                            (k.clone(), self.protect_value(v, replace))
                        }
                    })
                    .collect(),
            ),
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|i| self.protect_value(i, replace))
                    .collect(),
            ),
            other => other.clone(),
        }
    }
}

impl FieldSyntax for JsonSyntax {
    type Value = Value;

    fn syntax_name(&self) -> &'static str {
        "JSON"
    }

    fn max_string_length(&self) -> usize {
        self.max_string_length
    }

    fn value_to_sanitized_string(&self, value: &Value) -> String {
        self.sanitize_value(value).to_string()
    }

    fn parse_value(&self, s: &str) -> Result<Value> {
        if s == REDACTED_MARKER {
            trace!("JSON string is a complete redaction marker");
            return Err(SyntaxError::RedactedValue);
        }
        if is_complete_tokenized_marker(s) {
            trace!("JSON string is a complete tokenization marker");
            return Err(SyntaxError::TokenizedValue);
        }

        let value: Value = serde_json::from_str(s).map_err(SyntaxError::malformed)?;

        if let Some(map) = value.as_object() {
            if map.len() == 1 {
                if map.get("redacted").and_then(Value::as_str) == Some(REDACTED_MARKER) {
                    trace!("JSON document is the synthetic full-redaction object");
                    return Err(SyntaxError::RedactedValue);
                }
                if map
                    .get("tokenized")
                    .and_then(Value::as_str)
                    .is_some_and(is_complete_tokenized_marker)
                {
                    trace!("JSON document is the synthetic full-tokenization object");
                    return Err(SyntaxError::TokenizedValue);
                }
            }
        }

        Ok(value)
    }

    fn redact_entire_value(&self) -> &'static str {
        REDACTED_JSON
    }

    fn completely_redacted_value_conforms_to_syntax(&self) -> bool {
        true
    }

    fn supports_redacted_components(&self) -> bool {
        true
    }

    fn redact_components(&self, value: &Value) -> String {
        self.protect_value(value, &|_| Value::String(REDACTED_MARKER.to_string()))
            .to_string()
    }

    fn redacted_components_conform_to_syntax(&self) -> bool {
        true
    }

    fn tokenize_entire_value(&self, value: &Value, pepper: &[u8]) -> String {
        format!(
            "{{\"tokenized\":\"{}\"}}",
            tokenize(value.to_string().as_bytes(), pepper)
        )
    }

    fn completely_tokenized_value_conforms_to_syntax(&self) -> bool {
        true
    }

    fn supports_tokenized_components(&self) -> bool {
        true
    }

    fn tokenize_components(&self, value: &Value, pepper: &[u8]) -> String {
        self.protect_value(value, &|v| {
            Value::String(tokenize(v.to_string().as_bytes(), pepper))
        })
        .to_string()
    }

    fn tokenized_components_conform_to_syntax(&self) -> bool {
        true
    }

    fn value_string_is_completely_tokenized(&self, s: &str) -> bool {
        if is_complete_tokenized_marker(s) {
            return true;
        }
        s.strip_prefix("{\"tokenized\":\"")
            .and_then(|rest| rest.strip_suffix("\"}"))
            .is_some_and(is_complete_tokenized_marker)
    }

    // The three representations of a JSON document are themselves JSON,
    // so JSON-formatted logs embed them raw rather than as strings.

    fn log_sanitized_field_to_json(&self, field_name: &str, value: &Value, buf: &mut JsonLogBuffer) {
        buf.append_raw_field(field_name, &self.value_to_sanitized_string(value));
    }

    fn log_sanitized_value_to_json(&self, value: &Value, buf: &mut JsonLogBuffer) {
        buf.append_raw_value(&self.value_to_sanitized_string(value));
    }

    fn log_completely_redacted_field_to_json(&self, field_name: &str, buf: &mut JsonLogBuffer) {
        buf.append_raw_field(field_name, REDACTED_JSON);
    }

    fn log_completely_redacted_value_to_json(&self, buf: &mut JsonLogBuffer) {
        buf.append_raw_value(REDACTED_JSON);
    }

    fn log_redacted_components_field_to_json(
        &self,
        field_name: &str,
        value: &Value,
        buf: &mut JsonLogBuffer,
    ) {
        buf.append_raw_field(field_name, &self.redact_components(value));
    }

    fn log_redacted_components_value_to_json(&self, value: &Value, buf: &mut JsonLogBuffer) {
        buf.append_raw_value(&self.redact_components(value));
    }

    fn log_completely_tokenized_field_to_json(
        &self,
        field_name: &str,
        value: &Value,
        pepper: &[u8],
        buf: &mut JsonLogBuffer,
    ) {
        buf.append_raw_field(field_name, &self.tokenize_entire_value(value, pepper));
    }

    fn log_completely_tokenized_value_to_json(
        &self,
        value: &Value,
        pepper: &[u8],
        buf: &mut JsonLogBuffer,
    ) {
        buf.append_raw_value(&self.tokenize_entire_value(value, pepper));
    }

    fn log_tokenized_components_field_to_json(
        &self,
        field_name: &str,
        value: &Value,
        pepper: &[u8],
        buf: &mut JsonLogBuffer,
    ) {
        buf.append_raw_field(field_name, &self.tokenize_components(value, pepper));
    }

    fn log_tokenized_components_value_to_json(
        &self,
        value: &Value,
        pepper: &[u8],
        buf: &mut JsonLogBuffer,
    ) {
        buf.append_raw_value(&self.tokenize_components(value, pepper));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const NONE: [&str; 0] = [];

    #[test]
    fn test_sanitize_truncates_string_leaves_only() {
        let syntax = JsonSyntax::new(5, SensitivityPolicy::all_sensitive());
        let doc = json!({"name": "abcdefgh", "count": 12345678, "tags": ["short", "abcdefgh"]});
        assert_eq!(
            syntax.value_to_sanitized_string(&doc),
            r#"{"name":"abcde{3 more characters}","count":12345678,"tags":["short","abcde{3 more characters}"]}"#
        );
    }

    #[test]
    fn test_redact_sensitive_field_replaces_whole_value() {
        let policy = SensitivityPolicy::for_json_fields(["credentials"], NONE);
        let syntax = JsonSyntax::new(100, policy);
        let doc = json!({"credentials": {"user": "jdoe", "pass": "s3cret"}, "op": "bind"});
        assert_eq!(
            syntax.redact_components(&doc),
            r#"{"credentials":"{REDACTED}","op":"bind"}"#
        );
    }

    #[test]
    fn test_redact_recurses_into_non_sensitive_containers() {
        let policy = SensitivityPolicy::for_json_fields(["secret"], NONE);
        let syntax = JsonSyntax::new(100, policy);
        let doc = json!({"outer": {"secret": "x", "open": "y"}, "list": [{"secret": "z"}]});
        assert_eq!(
            syntax.redact_components(&doc),
            r#"{"outer":{"secret":"{REDACTED}","open":"y"},"list":[{"secret":"{REDACTED}"}]}"#
        );
    }

    #[test]
    fn test_scalar_array_elements_never_redacted() {
        let syntax = JsonSyntax::new(100, SensitivityPolicy::all_sensitive());
        let doc = json!(["a", "b", 3]);
        assert_eq!(syntax.redact_components(&doc), r#"["a","b",3]"#);
    }

    #[test]
    fn test_field_names_match_exactly() {
        let policy = SensitivityPolicy::for_json_fields(["Password"], NONE);
        let syntax = JsonSyntax::new(100, policy);
        let doc = json!({"Password": "a", "password": "b"});
        assert_eq!(
            syntax.redact_components(&doc),
            r#"{"Password":"{REDACTED}","password":"b"}"#
        );
    }

    #[test]
    fn test_full_redaction_form() {
        let syntax = JsonSyntax::new(100, SensitivityPolicy::all_sensitive());
        assert_eq!(syntax.redact_entire_value(), r#"{"redacted":"{REDACTED}"}"#);
        assert_eq!(
            syntax.parse_value(r#"{"redacted":"{REDACTED}"}"#),
            Err(SyntaxError::RedactedValue)
        );
        // Whitespace variants of the synthetic object classify the same way.
        assert_eq!(
            syntax.parse_value(r#"{ "redacted":"{REDACTED}" }"#),
            Err(SyntaxError::RedactedValue)
        );
    }

    #[test]
    fn test_full_tokenization_form() {
        let syntax = JsonSyntax::new(100, SensitivityPolicy::all_sensitive());
        let token = syntax.tokenize_entire_value(&json!({"uid": "jdoe"}), b"pepper");
        assert!(syntax.value_string_is_completely_tokenized(&token));
        assert_eq!(syntax.parse_value(&token), Err(SyntaxError::TokenizedValue));
        assert!(serde_json::from_str::<Value>(&token).is_ok());
    }

    #[test]
    fn test_roundtrip_preserves_field_order() {
        let syntax = JsonSyntax::new(100, SensitivityPolicy::all_sensitive());
        let doc = json!({"zebra": 1, "alpha": 2, "mid": {"b": 1, "a": 2}});
        let rendered = syntax.value_to_sanitized_string(&doc);
        assert_eq!(syntax.parse_value(&rendered).unwrap(), doc);
        assert_eq!(rendered, r#"{"zebra":1,"alpha":2,"mid":{"b":1,"a":2}}"#);
    }

    #[test]
    fn test_parse_object_resembling_marker_is_plain_data() {
        let syntax = JsonSyntax::new(100, SensitivityPolicy::all_sensitive());
        // Two fields: not the synthetic redaction object.
        let doc = syntax
            .parse_value(r#"{"redacted":"{REDACTED}","extra":1}"#)
            .unwrap();
        assert_eq!(doc.as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_parse_malformed() {
        let syntax = JsonSyntax::new(100, SensitivityPolicy::all_sensitive());
        assert!(matches!(
            syntax.parse_value("{not json"),
            Err(SyntaxError::Malformed(_))
        ));
    }

    #[test]
    fn test_json_emission_embeds_raw() {
        let syntax = JsonSyntax::new(100, SensitivityPolicy::all_sensitive());
        let mut buf = JsonLogBuffer::new();
        buf.begin_object();
        syntax.log_sanitized_field_to_json("request", &json!({"a": 1}), &mut buf);
        buf.end_object();
        assert_eq!(buf.as_str(), r#"{"request":{"a":1}}"#);
    }
}
