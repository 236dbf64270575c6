//! Matching filters over JSON objects.
//!
//! Used by log-analysis tooling to select log records whose JSON payload
//! carries an expected field value, after the field syntaxes have decoded
//! the record.

use serde_json::Value;

/// Matches a JSON object when a named top-level field equals a configured
/// value.
///
/// String comparison is case-insensitive by default, matching how LDAP
/// directory data is usually compared; [`set_case_sensitive`]
/// switches to exact comparison. Non-string values always compare
/// exactly.
///
/// [`set_case_sensitive`]: EqualsJsonObjectFilter::set_case_sensitive
#[derive(Debug, Clone)]
pub struct EqualsJsonObjectFilter {
    field: String,
    expected: Value,
    case_sensitive: bool,
}

impl EqualsJsonObjectFilter {
    /// Create a filter matching `field` against `expected`,
    /// case-insensitively for strings.
    pub fn new(field: impl Into<String>, expected: Value) -> Self {
        Self {
            field: field.into(),
            expected,
            case_sensitive: false,
        }
    }

    /// The field name this filter matches.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Whether string comparison is case-sensitive.
    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Switch between case-sensitive and case-insensitive string
    /// comparison.
    pub fn set_case_sensitive(&mut self, case_sensitive: bool) {
        self.case_sensitive = case_sensitive;
    }

    /// Returns whether the given JSON value is an object whose named
    /// top-level field equals the configured value.
    pub fn matches(&self, value: &Value) -> bool {
        value
            .as_object()
            .and_then(|map| map.get(&self.field))
            .is_some_and(|actual| self.values_equal(actual, &self.expected))
    }

    fn values_equal(&self, actual: &Value, expected: &Value) -> bool {
        match (actual, expected) {
            (Value::String(a), Value::String(e)) => {
                if self.case_sensitive {
                    a == e
                } else {
                    a.eq_ignore_ascii_case(e)
                }
            }
            (Value::Array(a), Value::Array(e)) => {
                a.len() == e.len()
                    && a.iter().zip(e).all(|(av, ev)| self.values_equal(av, ev))
            }
            (Value::Object(a), Value::Object(e)) => {
                a.len() == e.len()
                    && e.iter().all(|(k, ev)| {
                        a.get(k).is_some_and(|av| self.values_equal(av, ev))
                    })
            }
            (a, e) => a == e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_case_insensitive_by_default() {
        let filter = EqualsJsonObjectFilter::new("top-level-field", json!("foo"));
        assert!(filter.matches(&json!({"top-level-field": "Foo"})));
        assert!(filter.matches(&json!({"top-level-field": "foo"})));
        assert!(!filter.matches(&json!({"top-level-field": "bar"})));
    }

    #[test]
    fn test_case_sensitive_after_switch() {
        let mut filter = EqualsJsonObjectFilter::new("top-level-field", json!("foo"));
        filter.set_case_sensitive(true);
        assert!(!filter.matches(&json!({"top-level-field": "Foo"})));
        assert!(filter.matches(&json!({"top-level-field": "foo"})));
    }

    #[test]
    fn test_missing_field_never_matches() {
        let filter = EqualsJsonObjectFilter::new("field", json!("foo"));
        assert!(!filter.matches(&json!({"other": "foo"})));
        assert!(!filter.matches(&json!("foo")));
    }

    #[test]
    fn test_non_string_values_compare_exactly() {
        let filter = EqualsJsonObjectFilter::new("count", json!(42));
        assert!(filter.matches(&json!({"count": 42})));
        assert!(!filter.matches(&json!({"count": 43})));
        assert!(!filter.matches(&json!({"count": "42"})));
    }

    #[test]
    fn test_nested_values_honor_case_mode() {
        let filter = EqualsJsonObjectFilter::new("tags", json!(["One", "Two"]));
        assert!(filter.matches(&json!({"tags": ["one", "two"]})));

        let mut strict = filter.clone();
        strict.set_case_sensitive(true);
        assert!(!strict.matches(&json!({"tags": ["one", "two"]})));
    }
}
