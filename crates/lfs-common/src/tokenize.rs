//! Keyed, deterministic tokenization of sensitive values.
//!
//! Uses HMAC-SHA256 keyed by a caller-supplied pepper, truncated and
//! hex-encoded. Identical (value, pepper) pairs always produce identical
//! tokens, so the same underlying value can be correlated across
//! independent log entries without revealing it. Recovering the value
//! without the pepper is computationally infeasible.
//!
//! The pepper is borrowed for the duration of one call only; it is never
//! copied into long-lived state and never logged.

use crate::markers::TOKENIZED_PREFIX;
use hmac::{Hmac, Mac};
use sha2::Sha256;

/// Number of HMAC output bytes kept in the token payload (32 hex chars).
pub const TOKEN_DIGEST_BYTES: usize = 16;

/// Compute the opaque token payload for a value under the given pepper.
///
/// The output is lowercase hex, which contains none of the characters
/// that are grammar-significant in any syntax embedding the marker.
pub fn token_digest(value: &[u8], pepper: &[u8]) -> String {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(pepper).expect("HMAC can take key of any size");
    mac.update(value);
    let digest = mac.finalize().into_bytes();
    hex::encode(&digest[..TOKEN_DIGEST_BYTES])
}

/// Compute the complete `{TOKENIZED:<payload>}` marker for a value.
pub fn tokenize(value: &[u8], pepper: &[u8]) -> String {
    let mut out = String::with_capacity(TOKENIZED_PREFIX.len() + TOKEN_DIGEST_BYTES * 2 + 1);
    out.push_str(TOKENIZED_PREFIX);
    out.push_str(&token_digest(value, pepper));
    out.push('}');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markers::is_complete_tokenized_marker;

    #[test]
    fn test_tokenize_deterministic() {
        let token1 = tokenize(b"uid=jdoe", b"pepper");
        let token2 = tokenize(b"uid=jdoe", b"pepper");
        assert_eq!(token1, token2);
    }

    #[test]
    fn test_different_peppers_different_tokens() {
        let token1 = tokenize(b"uid=jdoe", b"pepper-one");
        let token2 = tokenize(b"uid=jdoe", b"pepper-two");
        assert_ne!(token1, token2);
    }

    #[test]
    fn test_different_values_different_tokens() {
        let token1 = tokenize(b"uid=jdoe", b"pepper");
        let token2 = tokenize(b"uid=asmith", b"pepper");
        assert_ne!(token1, token2);
    }

    #[test]
    fn test_token_is_complete_marker() {
        let token = tokenize(b"some value", b"pepper");
        assert!(is_complete_tokenized_marker(&token));
    }

    #[test]
    fn test_payload_length_fixed() {
        let short = token_digest(b"a", b"pepper");
        let long = token_digest(&[b'a'; 4096], b"pepper");
        assert_eq!(short.len(), TOKEN_DIGEST_BYTES * 2);
        assert_eq!(long.len(), TOKEN_DIGEST_BYTES * 2);
    }

    #[test]
    fn test_payload_excludes_grammar_characters() {
        let payload = token_digest(b"anything", b"pepper");
        for forbidden in [',', '}', '{', '*', '(', ')', '+', '='] {
            assert!(!payload.contains(forbidden));
        }
    }
}
