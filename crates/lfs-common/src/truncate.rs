//! Per-leaf string truncation for sanitized output.
//!
//! Truncation is applied independently to each scalar string leaf of a
//! value, never to an entire joined or serialized representation. Lengths
//! are counted in characters, not bytes.

use std::fmt::Write;

/// Sanitize a single string leaf: return it unchanged when it fits within
/// `max_chars`, otherwise the first `max_chars` characters followed by
/// `{N more characters}` where N is the number of characters dropped.
pub fn sanitize_string(s: &str, max_chars: usize) -> String {
    let mut out = String::with_capacity(s.len().min(max_chars + 24));
    sanitize_into(&mut out, s, max_chars);
    out
}

/// Buffer-writing variant of [`sanitize_string`] for the emission hot path.
pub fn sanitize_into(buf: &mut String, s: &str, max_chars: usize) {
    let total = s.chars().count();
    if total <= max_chars {
        buf.push_str(s);
        return;
    }

    let keep_bytes = s
        .char_indices()
        .nth(max_chars)
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    buf.push_str(&s[..keep_bytes]);
    let _ = write!(buf, "{{{} more characters}}", total - max_chars);
}
