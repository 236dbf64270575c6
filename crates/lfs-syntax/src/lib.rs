//! Per-datatype sanitization, redaction, and tokenization of log field
//! values.
//!
//! Every value written to an operational or audit log passes through a
//! [`FieldSyntax`] for its data type, which produces one of three safe
//! textual representations:
//!
//! - **Sanitized**: length-bounded but information-preserving; every
//!   scalar string leaf is independently truncated.
//! - **Redacted**: sensitive content replaced with `{REDACTED}`, whole
//!   value or per component, with the surrounding structure kept
//!   syntactically valid wherever feasible.
//! - **Tokenized**: sensitive content replaced with a deterministic
//!   `{TOKENIZED:...}` pseudonym keyed by a caller-supplied pepper, so
//!   the same value correlates across log entries without being revealed.
//!
//! Each representation parses back via [`FieldSyntax::parse_value`],
//! which distinguishes "deliberately redacted", "deliberately tokenized",
//! and "corrupt" as three different outcomes.
//!
//! # Example
//!
//! ```
//! use lfs_common::SensitivityPolicy;
//! use lfs_syntax::{DnSyntax, FieldSyntax};
//!
//! let no_exclusions: [&str; 0] = [];
//! let policy = SensitivityPolicy::for_attributes(["cn"], no_exclusions, None);
//! let syntax = DnSyntax::new(100, policy);
//!
//! let dn = syntax.parse_value("cn=test,dc=example,dc=com").unwrap();
//! assert_eq!(
//!     syntax.redact_components(&dn),
//!     "cn={REDACTED},dc=example,dc=com"
//! );
//! ```

pub mod dn;
pub mod filter;
pub mod json;
pub mod json_filter;
pub mod list;
pub mod string;
pub mod syntax;
pub mod timestamp;

pub use dn::DnSyntax;
pub use filter::FilterSyntax;
pub use json::JsonSyntax;
pub use json_filter::EqualsJsonObjectFilter;
pub use list::CommaDelimitedListSyntax;
pub use string::StringSyntax;
pub use syntax::FieldSyntax;
pub use timestamp::{GeneralizedTimeSyntax, Rfc3339TimestampSyntax};

pub use lfs_common::{
    JsonLogBuffer, Result, SensitivityPolicy, SyntaxError, TextLogBuffer,
};
