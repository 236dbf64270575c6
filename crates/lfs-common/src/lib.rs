//! Shared leaves of the log field syntax framework.
//!
//! This crate provides the pieces every concrete field syntax depends on:
//! - Well-known redaction and tokenization marker strings
//! - The `SyntaxError` taxonomy for classifying stored log values
//! - A keyed, deterministic tokenizer (HMAC-SHA256 over a caller-supplied pepper)
//! - `SensitivityPolicy` with include/exclude name sets and OID aliasing
//! - Per-leaf string truncation for sanitization
//! - Text and JSON log buffers used by the emission adapters

pub mod buffer;
pub mod error;
pub mod markers;
pub mod policy;
pub mod tokenize;
pub mod truncate;

pub use buffer::{JsonLogBuffer, TextLogBuffer};
pub use error::{Result, SyntaxError};
pub use policy::{AttributeSchema, SensitivityPolicy};
pub use tokenize::{token_digest, tokenize, TOKEN_DIGEST_BYTES};
pub use truncate::{sanitize_into, sanitize_string};
