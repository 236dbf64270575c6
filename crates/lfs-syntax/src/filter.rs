//! Syntax for search filter fields.

use crate::syntax::FieldSyntax;
use lfs_common::markers::{is_complete_tokenized_marker, REDACTED_MARKER};
use lfs_common::{sanitize_string, tokenize, Result, SensitivityPolicy, SyntaxError};
use lfs_ldap::Filter;
use tracing::trace;

/// Whole-value redaction form: a synthetic top-level equality filter, so
/// the output is still a syntactically valid filter.
const REDACTED_FILTER: &str = "(redacted={REDACTED})";

/// Log field syntax for search filter values with recursive
/// component-level redaction and tokenization.
///
/// Sensitivity is keyed by each leaf's attribute name. A leaf with no
/// resolvable name (an extensible match carrying only a matching rule ID)
/// is not sensitive under an include-only policy but sensitive under an
/// exclude-only policy; the asymmetry follows directly from the
/// include/exclude rule and is relied upon by log-analysis tooling.
#[derive(Debug, Clone)]
pub struct FilterSyntax {
    max_string_length: usize,
    policy: SensitivityPolicy,
}

impl FilterSyntax {
    /// Create a filter syntax with the given truncation limit and
    /// attribute-name sensitivity policy.
    pub fn new(max_string_length: usize, policy: SensitivityPolicy) -> Self {
        Self {
            max_string_length,
            policy,
        }
    }

    /// Rebuild the filter with every assertion value passed through
    /// `transform`. Operators, nesting, attribute names, and the number
    /// and order of substring components are preserved; presence filters
    /// carry no assertion value and pass through untouched.
    fn transform_values(
        &self,
        filter: &Filter,
        transform: &impl Fn(Option<&str>, &str) -> String,
    ) -> Filter {
        match filter {
            Filter::And(children) => Filter::And(
                children
                    .iter()
                    .map(|c| self.transform_values(c, transform))
                    .collect(),
            ),
            Filter::Or(children) => Filter::Or(
                children
                    .iter()
                    .map(|c| self.transform_values(c, transform))
                    .collect(),
            ),
            Filter::Not(child) => {
                Filter::Not(Box::new(self.transform_values(child, transform)))
            }
            Filter::Presence { attribute } => Filter::Presence {
                attribute: attribute.clone(),
            },
            Filter::Equality { attribute, value } => Filter::Equality {
                attribute: attribute.clone(),
                value: transform(Some(attribute), value),
            },
            Filter::GreaterOrEqual { attribute, value } => Filter::GreaterOrEqual {
                attribute: attribute.clone(),
                value: transform(Some(attribute), value),
            },
            Filter::LessOrEqual { attribute, value } => Filter::LessOrEqual {
                attribute: attribute.clone(),
                value: transform(Some(attribute), value),
            },
            Filter::Approximate { attribute, value } => Filter::Approximate {
                attribute: attribute.clone(),
                value: transform(Some(attribute), value),
            },
            Filter::Substring {
                attribute,
                sub_initial,
                sub_any,
                sub_final,
            } => Filter::Substring {
                attribute: attribute.clone(),
                sub_initial: sub_initial
                    .as_ref()
                    .map(|v| transform(Some(attribute), v)),
                sub_any: sub_any
                    .iter()
                    .map(|v| transform(Some(attribute), v))
                    .collect(),
                sub_final: sub_final.as_ref().map(|v| transform(Some(attribute), v)),
            },
            Filter::ExtensibleMatch {
                attribute,
                matching_rule_id,
                dn_attributes,
                value,
            } => Filter::ExtensibleMatch {
                attribute: attribute.clone(),
                matching_rule_id: matching_rule_id.clone(),
                dn_attributes: *dn_attributes,
                value: transform(attribute.as_deref(), value),
            },
        }
    }
}

impl FieldSyntax for FilterSyntax {
    type Value = Filter;

    fn syntax_name(&self) -> &'static str {
        "filter"
    }

    fn max_string_length(&self) -> usize {
        self.max_string_length
    }

    fn value_to_sanitized_string(&self, value: &Filter) -> String {
        self.transform_values(value, &|_, v| sanitize_string(v, self.max_string_length))
            .to_string()
    }

    fn parse_value(&self, s: &str) -> Result<Filter> {
        if self.value_string_is_completely_redacted(s) {
            trace!("filter string is a complete redaction marker");
            return Err(SyntaxError::RedactedValue);
        }
        if self.value_string_is_completely_tokenized(s) {
            trace!("filter string is a complete tokenization marker");
            return Err(SyntaxError::TokenizedValue);
        }
        Filter::parse(s).map_err(SyntaxError::malformed)
    }

    fn redact_entire_value(&self) -> &'static str {
        REDACTED_FILTER
    }

    fn completely_redacted_value_conforms_to_syntax(&self) -> bool {
        true
    }

    fn supports_redacted_components(&self) -> bool {
        true
    }

    fn redact_components(&self, value: &Filter) -> String {
        self.transform_values(value, &|name, v| {
            if self.policy.is_name_sensitive(name) {
                REDACTED_MARKER.to_string()
            } else {
                v.to_string()
            }
        })
        .to_string()
    }

    fn redacted_components_conform_to_syntax(&self) -> bool {
        true
    }

    fn tokenize_entire_value(&self, value: &Filter, pepper: &[u8]) -> String {
        format!(
            "(tokenized={})",
            tokenize(value.to_string().as_bytes(), pepper)
        )
    }

    fn completely_tokenized_value_conforms_to_syntax(&self) -> bool {
        true
    }

    fn supports_tokenized_components(&self) -> bool {
        true
    }

    fn tokenize_components(&self, value: &Filter, pepper: &[u8]) -> String {
        self.transform_values(value, &|name, v| {
            if self.policy.is_name_sensitive(name) {
                tokenize(v.as_bytes(), pepper)
            } else {
                v.to_string()
            }
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
        s.strip_prefix("(tokenized=")
            .and_then(|rest| rest.strip_suffix(')'))
            .is_some_and(is_complete_tokenized_marker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: [&str; 0] = [];

    fn filter(s: &str) -> Filter {
        Filter::parse(s).unwrap()
    }

    #[test]
    fn test_sanitize_truncates_assertion_values() {
        let syntax = FilterSyntax::new(10, SensitivityPolicy::all_sensitive());
        assert_eq!(
            syntax.value_to_sanitized_string(&filter("(a=ThisIsALongerValue)")),
            "(a=ThisIsALon{8 more characters})"
        );
    }

    #[test]
    fn test_redact_components_recursive() {
        let policy = SensitivityPolicy::for_attributes(["uid", "cn"], NONE, None);
        let syntax = FilterSyntax::new(100, policy);
        assert_eq!(
            syntax.redact_components(&filter(
                "(&(objectClass=person)(|(uid=jdoe)(cn=John Doe)))"
            )),
            "(&(objectClass=person)(|(uid={REDACTED})(cn={REDACTED})))"
        );
    }

    #[test]
    fn test_presence_never_altered() {
        let syntax = FilterSyntax::new(100, SensitivityPolicy::all_sensitive());
        assert_eq!(
            syntax.redact_components(&filter("(objectClass=*)")),
            "(objectClass=*)"
        );
    }

    #[test]
    fn test_substring_components_transformed_independently() {
        let syntax = FilterSyntax::new(100, SensitivityPolicy::all_sensitive());
        assert_eq!(
            syntax.redact_components(&filter("(cn=ab*cd*ef)")),
            "(cn={REDACTED}*{REDACTED}*{REDACTED})"
        );
    }

    #[test]
    fn test_unnamed_leaf_policy_asymmetry() {
        let rule_only = filter("(:caseIgnoreMatch:=secret)");

        let include = SensitivityPolicy::for_attributes(["unrelated"], NONE, None);
        let syntax = FilterSyntax::new(100, include);
        assert_eq!(
            syntax.redact_components(&rule_only),
            "(:caseIgnoreMatch:=secret)"
        );

        let exclude = SensitivityPolicy::for_attributes(NONE, ["unrelated"], None);
        let syntax = FilterSyntax::new(100, exclude);
        assert_eq!(
            syntax.redact_components(&rule_only),
            "(:caseIgnoreMatch:={REDACTED})"
        );
    }

    #[test]
    fn test_full_redaction_form() {
        let syntax = FilterSyntax::new(100, SensitivityPolicy::all_sensitive());
        assert_eq!(syntax.redact_entire_value(), "(redacted={REDACTED})");
        assert_eq!(
            syntax.parse_value("(redacted={REDACTED})"),
            Err(SyntaxError::RedactedValue)
        );
        assert!(Filter::parse(syntax.redact_entire_value()).is_ok());
    }

    #[test]
    fn test_full_tokenization_form() {
        let syntax = FilterSyntax::new(100, SensitivityPolicy::all_sensitive());
        let token = syntax.tokenize_entire_value(&filter("(uid=jdoe)"), b"pepper");
        assert!(token.starts_with("(tokenized={TOKENIZED:"));
        assert!(token.ends_with("})"));
        assert!(syntax.value_string_is_completely_tokenized(&token));
        assert_eq!(syntax.parse_value(&token), Err(SyntaxError::TokenizedValue));
        assert!(Filter::parse(&token).is_ok());
    }

    #[test]
    fn test_tokenize_components_reparse_preserves_structure() {
        let syntax = FilterSyntax::new(100, SensitivityPolicy::all_sensitive());
        let tokenized =
            syntax.tokenize_components(&filter("(&(uid=jdoe)(!(cn=John)))"), b"pepper");
        let reparsed = Filter::parse(&tokenized).unwrap();
        let Filter::And(children) = reparsed else {
            panic!("expected AND");
        };
        assert_eq!(children.len(), 2);
        assert!(matches!(children[1], Filter::Not(_)));
    }

    #[test]
    fn test_parse_malformed() {
        let syntax = FilterSyntax::new(100, SensitivityPolicy::all_sensitive());
        assert!(matches!(
            syntax.parse_value("(uid=jdoe"),
            Err(SyntaxError::Malformed(_))
        ));
    }
}
