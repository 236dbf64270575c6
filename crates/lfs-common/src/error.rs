//! Error types for parsing stored log field values.
//!
//! A stored value that cannot be parsed falls into exactly one of three
//! outcomes: it is a recognized full-redaction marker, a recognized
//! full-tokenization marker, or it is malformed. The first two let
//! log-analysis tooling report "value intentionally hidden by policy"
//! instead of "corrupt data".

use thiserror::Error;

/// Result type for log field syntax operations.
pub type Result<T> = std::result::Result<T, SyntaxError>;

/// Why a stored log field value could not be parsed back into a typed value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    /// The value is a recognized full-redaction marker for the syntax.
    #[error("value is a complete redaction marker")]
    RedactedValue,

    /// The value is a recognized full-tokenization marker for the syntax.
    #[error("value is a complete tokenization marker")]
    TokenizedValue,

    /// The value is neither valid input for the syntax nor a recognized marker.
    #[error("malformed value: {0}")]
    Malformed(String),
}

impl SyntaxError {
    /// Create a malformed-value error from any displayable cause.
    pub fn malformed(cause: impl std::fmt::Display) -> Self {
        SyntaxError::Malformed(cause.to_string())
    }

    /// Returns whether this error marks a deliberately hidden value
    /// (redacted or tokenized) rather than corrupt data.
    pub fn is_intentionally_hidden(&self) -> bool {
        matches!(
            self,
            SyntaxError::RedactedValue | SyntaxError::TokenizedValue
        )
    }
}
