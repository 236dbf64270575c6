//! Error types for DN and filter string parsing.

use thiserror::Error;

/// Result type for LDAP grammar operations.
pub type Result<T> = std::result::Result<T, LdapParseError>;

/// Errors raised while parsing a DN or filter string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LdapParseError {
    /// The string is not a valid distinguished name.
    #[error("invalid DN: {0}")]
    InvalidDn(String),

    /// The string is not a valid search filter.
    #[error("invalid filter: {0}")]
    InvalidFilter(String),
}
