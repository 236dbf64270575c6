//! Well-known marker strings embedded in log output.
//!
//! The marker literals are wire-visible: log-analysis tooling matches them
//! byte for byte, so they must never change.

/// Marker substituted for a redacted value or component.
pub const REDACTED_MARKER: &str = "{REDACTED}";

/// Prefix of a tokenization marker. The full marker is
/// `{TOKENIZED:<payload>}` where the payload is an opaque, comma-free,
/// brace-free encoding of the tokenizer output.
pub const TOKENIZED_PREFIX: &str = "{TOKENIZED:";

/// Sentinel generalized-time value used when an entire timestamp is
/// redacted. Out of range for real data but grammatically valid, so
/// redacted timestamp fields stay sortable and parseable.
pub const REDACTED_GENERALIZED_TIME: &str = "99990101000000.000Z";

/// Sentinel RFC 3339 value used when an entire timestamp is redacted.
pub const REDACTED_RFC3339_TIME: &str = "9999-01-01T00:00:00.000Z";

/// Returns whether the string contains a redaction marker anywhere.
pub fn includes_redacted_component(s: &str) -> bool {
    s.contains(REDACTED_MARKER)
}

/// Returns whether the string contains a tokenization marker anywhere.
pub fn includes_tokenized_component(s: &str) -> bool {
    s.contains(TOKENIZED_PREFIX)
}

/// Returns whether the string is exactly one complete tokenization marker:
/// `{TOKENIZED:<payload>}` with a non-empty payload free of characters
/// that are grammar-significant in any embedding syntax.
pub fn is_complete_tokenized_marker(s: &str) -> bool {
    let Some(rest) = s.strip_prefix(TOKENIZED_PREFIX) else {
        return false;
    };
    let Some(payload) = rest.strip_suffix('}') else {
        return false;
    };
    !payload.is_empty() && payload.chars().all(is_valid_token_payload_char)
}

/// Characters permitted in a token payload. Excludes every character with
/// grammatical meaning in a syntax that embeds the marker: `,`, `{`, `}`,
/// `*`, `(`, `)`, plus whitespace and the DN/filter separators `+` and `=`.
fn is_valid_token_payload_char(c: char) -> bool {
    !matches!(
        c,
        ',' | '{' | '}' | '*' | '(' | ')' | '+' | '=' | '\\' | '"'
    ) && !c.is_whitespace()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_includes_redacted_component() {
        assert!(includes_redacted_component("cn={REDACTED},dc=example"));
        assert!(includes_redacted_component("{REDACTED}"));
        assert!(!includes_redacted_component("cn=test,dc=example"));
        assert!(!includes_redacted_component("{REDACTED"));
    }

    #[test]
    fn test_includes_tokenized_component() {
        assert!(includes_tokenized_component("cn={TOKENIZED:abc123}"));
        assert!(!includes_tokenized_component("cn={REDACTED}"));
    }

    #[test]
    fn test_complete_tokenized_marker() {
        assert!(is_complete_tokenized_marker("{TOKENIZED:abcdef0123}"));
        assert!(!is_complete_tokenized_marker("{TOKENIZED:}"));
        assert!(!is_complete_tokenized_marker("{TOKENIZED:abc"));
        assert!(!is_complete_tokenized_marker("x{TOKENIZED:abc}"));
        assert!(!is_complete_tokenized_marker("{TOKENIZED:ab,cd}"));
        assert!(!is_complete_tokenized_marker("{TOKENIZED:ab}cd}"));
        assert!(!is_complete_tokenized_marker("{TOKENIZED:a*b}"));
        assert!(!is_complete_tokenized_marker("{REDACTED}"));
    }
}
