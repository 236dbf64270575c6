//! Syntax for distinguished name fields.

use crate::syntax::FieldSyntax;
use lfs_common::markers::{is_complete_tokenized_marker, REDACTED_MARKER};
use lfs_common::{sanitize_string, tokenize, Result, SensitivityPolicy, SyntaxError};
use lfs_ldap::{Ava, Dn, Rdn};
use tracing::trace;

/// Whole-value redaction form: a single synthetic RDN holding the marker,
/// so the output is still a syntactically valid DN.
const REDACTED_DN: &str = "redacted={REDACTED}";

/// Log field syntax for DN values with component-level redaction and
/// tokenization driven by a [`SensitivityPolicy`] over attribute names.
#[derive(Debug, Clone)]
pub struct DnSyntax {
    max_string_length: usize,
    policy: SensitivityPolicy,
}

impl DnSyntax {
    /// Create a DN syntax with the given truncation limit and
    /// attribute-name sensitivity policy.
    pub fn new(max_string_length: usize, policy: SensitivityPolicy) -> Self {
        Self {
            max_string_length,
            policy,
        }
    }

    fn transform_values(&self, dn: &Dn, mut transform: impl FnMut(&Ava) -> String) -> Dn {
        Dn::new(
            dn.rdns
                .iter()
                .map(|rdn| Rdn {
                    avas: rdn
                        .avas
                        .iter()
                        .map(|ava| Ava::new(ava.attribute.clone(), transform(ava)))
                        .collect(),
                })
                .collect(),
        )
    }
}

impl FieldSyntax for DnSyntax {
    type Value = Dn;

    fn syntax_name(&self) -> &'static str {
        "DN"
    }

    fn max_string_length(&self) -> usize {
        self.max_string_length
    }

    fn value_to_sanitized_string(&self, value: &Dn) -> String {
        self.transform_values(value, |ava| {
            sanitize_string(&ava.value, self.max_string_length)
        })
        .to_string()
    }

    fn parse_value(&self, s: &str) -> Result<Dn> {
        if self.value_string_is_completely_redacted(s) {
            trace!("DN string is a complete redaction marker");
            return Err(SyntaxError::RedactedValue);
        }
        if self.value_string_is_completely_tokenized(s) {
            trace!("DN string is a complete tokenization marker");
            return Err(SyntaxError::TokenizedValue);
        }
        Dn::parse(s).map_err(SyntaxError::malformed)
    }

    fn redact_entire_value(&self) -> &'static str {
        REDACTED_DN
    }

    fn completely_redacted_value_conforms_to_syntax(&self) -> bool {
        true
    }

    fn supports_redacted_components(&self) -> bool {
        true
    }

    fn redact_components(&self, value: &Dn) -> String {
        self.transform_values(value, |ava| {
            if self.policy.is_name_sensitive(Some(&ava.attribute)) {
                REDACTED_MARKER.to_string()
            } else {
                ava.value.clone()
            }
        })
        .to_string()
    }

    fn redacted_components_conform_to_syntax(&self) -> bool {
        true
    }

    fn tokenize_entire_value(&self, value: &Dn, pepper: &[u8]) -> String {
        format!(
            "tokenized={}",
            tokenize(value.to_string().as_bytes(), pepper)
        )
    }

    fn completely_tokenized_value_conforms_to_syntax(&self) -> bool {
        true
    }

    fn supports_tokenized_components(&self) -> bool {
        true
    }

    fn tokenize_components(&self, value: &Dn, pepper: &[u8]) -> String {
        self.transform_values(value, |ava| {
            if self.policy.is_name_sensitive(Some(&ava.attribute)) {
                tokenize(ava.value.as_bytes(), pepper)
            } else {
                ava.value.clone()
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
        s.strip_prefix("tokenized=")
            .is_some_and(is_complete_tokenized_marker)
    }
}
