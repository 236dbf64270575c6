//! LDAP distinguished name and search filter grammars.
//!
//! This crate provides the structured value models the log field syntax
//! framework wraps:
//! - [`Dn`]: an ordered sequence of RDNs, each an ordered list of
//!   attribute/value pairs, with RFC 4514 string parsing and encoding
//! - [`Filter`]: the search filter AST with RFC 4515 string parsing and
//!   encoding
//!
//! Both models parse their own `Display` output for every value the
//! framework emits, including values carrying redaction and tokenization
//! markers (`{` and `}` are not grammar-significant in either syntax).

pub mod dn;
pub mod error;
pub mod filter;

pub use dn::{Ava, Dn, Rdn};
pub use error::{LdapParseError, Result};
pub use filter::Filter;
