//! Syntaxes for timestamp fields.
//!
//! Both timestamp syntaxes redact to an out-of-range but grammatically
//! valid sentinel date in year 9999, so redacted timestamp fields stay
//! numerically sortable and machine-parseable.

use crate::syntax::{check_scalar_markers, FieldSyntax};
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use lfs_common::markers::{REDACTED_GENERALIZED_TIME, REDACTED_RFC3339_TIME};
use lfs_common::{sanitize_string, tokenize, Result, SyntaxError};

/// Log field syntax for LDAP generalized time values
/// (`YYYYMMDDHHMMSS.mmmZ`). Whole-value redaction and tokenization only.
#[derive(Debug, Clone)]
pub struct GeneralizedTimeSyntax {
    max_string_length: usize,
}

impl GeneralizedTimeSyntax {
    /// Create a generalized time syntax.
    pub fn new(max_string_length: usize) -> Self {
        Self { max_string_length }
    }
}

impl FieldSyntax for GeneralizedTimeSyntax {
    type Value = DateTime<Utc>;

    fn syntax_name(&self) -> &'static str {
        "generalized-time"
    }

    fn max_string_length(&self) -> usize {
        self.max_string_length
    }

    fn value_to_sanitized_string(&self, value: &DateTime<Utc>) -> String {
        sanitize_string(
            &value.format("%Y%m%d%H%M%S%.3fZ").to_string(),
            self.max_string_length,
        )
    }

    fn parse_value(&self, s: &str) -> Result<DateTime<Utc>> {
        check_scalar_markers(s)?;

        let body = s
            .strip_suffix('Z')
            .ok_or_else(|| SyntaxError::Malformed(format!("'{}' lacks the 'Z' suffix", s)))?;
        let naive = NaiveDateTime::parse_from_str(body, "%Y%m%d%H%M%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(body, "%Y%m%d%H%M%S"))
            .map_err(|e| SyntaxError::Malformed(format!("'{}' is not a generalized time: {}", s, e)))?;
        Ok(naive.and_utc())
    }

    fn redact_entire_value(&self) -> &'static str {
        REDACTED_GENERALIZED_TIME
    }

    fn completely_redacted_value_conforms_to_syntax(&self) -> bool {
        // The year-9999 sentinel is a legal generalized time.
        true
    }

    fn tokenize_entire_value(&self, value: &DateTime<Utc>, pepper: &[u8]) -> String {
        tokenize(
            value.format("%Y%m%d%H%M%S%.3fZ").to_string().as_bytes(),
            pepper,
        )
    }

    fn completely_tokenized_value_conforms_to_syntax(&self) -> bool {
        // The bare marker is not itself a parseable timestamp.
        false
    }
}

/// Log field syntax for RFC 3339 timestamps with millisecond precision.
/// Whole-value redaction and tokenization only.
#[derive(Debug, Clone)]
pub struct Rfc3339TimestampSyntax {
    max_string_length: usize,
}

impl Rfc3339TimestampSyntax {
    /// Create an RFC 3339 timestamp syntax.
    pub fn new(max_string_length: usize) -> Self {
        Self { max_string_length }
    }
}

impl FieldSyntax for Rfc3339TimestampSyntax {
    type Value = DateTime<Utc>;

    fn syntax_name(&self) -> &'static str {
        "rfc3339-timestamp"
    }

    fn max_string_length(&self) -> usize {
        self.max_string_length
    }

    fn value_to_sanitized_string(&self, value: &DateTime<Utc>) -> String {
        sanitize_string(
            &value.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.max_string_length,
        )
    }

    fn parse_value(&self, s: &str) -> Result<DateTime<Utc>> {
        check_scalar_markers(s)?;
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| SyntaxError::Malformed(format!("'{}' is not an RFC 3339 timestamp: {}", s, e)))
    }

    fn redact_entire_value(&self) -> &'static str {
        REDACTED_RFC3339_TIME
    }

    fn completely_redacted_value_conforms_to_syntax(&self) -> bool {
        true
    }

    fn tokenize_entire_value(&self, value: &DateTime<Utc>, pepper: &[u8]) -> String {
        tokenize(
            value
                .to_rfc3339_opts(SecondsFormat::Millis, true)
                .as_bytes(),
            pepper,
        )
    }

    fn completely_tokenized_value_conforms_to_syntax(&self) -> bool {
        false
    }
}
