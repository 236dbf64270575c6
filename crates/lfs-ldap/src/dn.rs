//! Distinguished name model and RFC 4514 string form.
//!
//! A DN is an ordered sequence of RDNs separated by `,`; each RDN is an
//! ordered list of attribute/value pairs joined with `+` when
//! multi-valued. Values escape the separator characters with a backslash,
//! either as `\<char>` or as a two-digit hex pair.

use crate::error::{LdapParseError, Result};
use std::fmt;

/// A single attribute/value assertion within an RDN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ava {
    /// The attribute type, as a descriptor (`cn`) or numeric OID.
    pub attribute: String,
    /// The attribute value, unescaped.
    pub value: String,
}

impl Ava {
    /// Create an attribute/value assertion.
    pub fn new(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            value: value.into(),
        }
    }
}

/// A relative distinguished name: one or more attribute/value pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rdn {
    /// The assertions of this RDN, in order. More than one means a
    /// multi-valued RDN (`cn=a+sn=b`).
    pub avas: Vec<Ava>,
}

impl Rdn {
    /// Create an RDN with a single attribute/value pair.
    pub fn single(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            avas: vec![Ava::new(attribute, value)],
        }
    }
}

/// A distinguished name: an ordered sequence of RDNs.
///
/// The empty sequence is the null DN and renders as the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Dn {
    /// The RDNs of this DN, most specific first.
    pub rdns: Vec<Rdn>,
}

impl Dn {
    /// Create a DN from a sequence of RDNs.
    pub fn new(rdns: Vec<Rdn>) -> Self {
        Self { rdns }
    }

    /// Parse the RFC 4514 string form of a DN.
    pub fn parse(s: &str) -> Result<Self> {
        if s.trim().is_empty() {
            return Ok(Dn::default());
        }

        let mut rdns = Vec::new();
        for rdn_part in split_unescaped(s, ',') {
            rdns.push(parse_rdn(&rdn_part)?);
        }
        Ok(Dn { rdns })
    }
}

impl fmt::Display for Dn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, rdn) in self.rdns.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            for (j, ava) in rdn.avas.iter().enumerate() {
                if j > 0 {
                    f.write_str("+")?;
                }
                f.write_str(&ava.attribute)?;
                f.write_str("=")?;
                write_escaped_value(f, &ava.value)?;
            }
        }
        Ok(())
    }
}

fn parse_rdn(part: &str) -> Result<Rdn> {
    let mut avas = Vec::new();
    for ava_part in split_unescaped(part, '+') {
        avas.push(parse_ava(&ava_part)?);
    }
    if avas.is_empty() {
        return Err(LdapParseError::InvalidDn("empty RDN".to_string()));
    }
    Ok(Rdn { avas })
}

fn parse_ava(part: &str) -> Result<Ava> {
    let eq = find_unescaped(part, '=').ok_or_else(|| {
        LdapParseError::InvalidDn(format!("RDN component '{}' has no '='", part.trim()))
    })?;

    let attribute = part[..eq].trim();
    if attribute.is_empty() {
        return Err(LdapParseError::InvalidDn(
            "empty attribute type".to_string(),
        ));
    }
    if !is_valid_attribute_type(attribute) {
        return Err(LdapParseError::InvalidDn(format!(
            "invalid attribute type '{}'",
            attribute
        )));
    }

    let value = unescape_value(trim_raw_value(&part[eq + 1..]))?;
    Ok(Ava {
        attribute: attribute.to_string(),
        value,
    })
}

/// Trim the optional spaces around a raw attribute value, leaving an
/// escaped trailing space (`\ ` or the tail of a `\20` pair) intact.
fn trim_raw_value(raw: &str) -> &str {
    let raw = raw.trim_start_matches(' ');
    let bytes = raw.as_bytes();
    let mut end = bytes.len();
    while end > 0 && bytes[end - 1] == b' ' {
        let backslashes = bytes[..end - 1]
            .iter()
            .rev()
            .take_while(|&&b| b == b'\\')
            .count();
        if backslashes % 2 == 1 {
            break;
        }
        end -= 1;
    }
    &raw[..end]
}

/// Attribute types are descriptors (leading alpha, then alphanumerics and
/// hyphens) or numeric OIDs (digits and dots).
fn is_valid_attribute_type(s: &str) -> bool {
    s.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
}

/// Split on an unescaped separator, leaving escapes intact in each piece.
fn split_unescaped(s: &str, sep: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut escaped = false;
    for c in s.chars() {
        if escaped {
            current.push(c);
            escaped = false;
        } else if c == '\\' {
            current.push(c);
            escaped = true;
        } else if c == sep {
            parts.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    parts.push(current);
    parts
}

fn find_unescaped(s: &str, target: char) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == target {
            return Some(i);
        }
    }
    None
}

/// Unescape a DN attribute value: `\<special>` keeps the character,
/// `\XX` hex pairs decode to bytes.
fn unescape_value(raw: &str) -> Result<String> {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' {
            if i + 2 < bytes.len()
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit()
            {
                out.push((hex_digit(bytes[i + 1]) << 4) | hex_digit(bytes[i + 2]));
                i += 3;
                continue;
            }
            if i + 1 >= bytes.len() {
                return Err(LdapParseError::InvalidDn(
                    "value ends with a dangling escape".to_string(),
                ));
            }
            out.push(bytes[i + 1]);
            i += 2;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out)
        .map_err(|_| LdapParseError::InvalidDn("escaped value is not valid UTF-8".to_string()))
}

fn hex_digit(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        _ => b - b'A' + 10,
    }
}

fn write_escaped_value(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    let last = value.chars().count().saturating_sub(1);
    for (i, c) in value.chars().enumerate() {
        match c {
            '\\' | ',' | '+' | '"' | ';' | '<' | '>' => {
                f.write_str("\\")?;
                f.write_fmt(format_args!("{}", c))?;
            }
            '#' if i == 0 => f.write_str("\\#")?,
            ' ' if i == 0 || i == last => f.write_str("\\ ")?,
            c => f.write_fmt(format_args!("{}", c))?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_dn() {
        let dn = Dn::parse("cn=test,dc=example,dc=com").unwrap();
        assert_eq!(dn.rdns.len(), 3);
        assert_eq!(dn.rdns[0], Rdn::single("cn", "test"));
        assert_eq!(dn.rdns[1], Rdn::single("dc", "example"));
        assert_eq!(dn.rdns[2], Rdn::single("dc", "com"));
    }

    #[test]
    fn test_parse_multivalued_rdn() {
        let dn = Dn::parse("cn=John Doe+mail=jdoe@example.com,dc=example").unwrap();
        assert_eq!(dn.rdns[0].avas.len(), 2);
        assert_eq!(dn.rdns[0].avas[0], Ava::new("cn", "John Doe"));
        assert_eq!(dn.rdns[0].avas[1], Ava::new("mail", "jdoe@example.com"));
    }

    #[test]
    fn test_parse_escaped_separator() {
        let dn = Dn::parse("cn=Doe\\, John,dc=example").unwrap();
        assert_eq!(dn.rdns.len(), 2);
        assert_eq!(dn.rdns[0].avas[0].value, "Doe, John");
    }

    #[test]
    fn test_parse_hex_escape() {
        let dn = Dn::parse("cn=ab\\2c cd").unwrap();
        assert_eq!(dn.rdns[0].avas[0].value, "ab, cd");
    }

    #[test]
    fn test_parse_null_dn() {
        let dn = Dn::parse("").unwrap();
        assert!(dn.rdns.is_empty());
        assert_eq!(dn.to_string(), "");
    }

    #[test]
    fn test_parse_spaces_after_comma() {
        let dn = Dn::parse("cn=test, dc=example, dc=com").unwrap();
        assert_eq!(dn.rdns[1], Rdn::single("dc", "example"));
    }

    #[test]
    fn test_parse_rejects_missing_equals() {
        assert!(matches!(
            Dn::parse("cn"),
            Err(LdapParseError::InvalidDn(_))
        ));
    }

    #[test]
    fn test_parse_rejects_empty_attribute() {
        assert!(Dn::parse("=test,dc=example").is_err());
    }

    #[test]
    fn test_parse_rejects_invalid_attribute() {
        assert!(Dn::parse("c n=test").is_err());
    }

    #[test]
    fn test_escaped_trailing_space_survives_trimming() {
        let dn = Dn::parse("cn=trailing\\ ,dc=example").unwrap();
        assert_eq!(dn.rdns[0].avas[0].value, "trailing ");
        assert_eq!(Dn::parse(&dn.to_string()).unwrap(), dn);
    }

    #[test]
    fn test_display_escapes_specials() {
        let dn = Dn::new(vec![
            Rdn::single("cn", "Doe, John"),
            Rdn::single("dc", "example"),
        ]);
        assert_eq!(dn.to_string(), "cn=Doe\\, John,dc=example");
    }

    #[test]
    fn test_display_roundtrip() {
        for input in [
            "cn=test,dc=example,dc=com",
            "cn=Doe\\, John+mail=j@example.com,dc=example",
            "ou=R\\+D,dc=example",
            "2.5.4.3=oid-named,dc=example",
        ] {
            let dn = Dn::parse(input).unwrap();
            let rendered = dn.to_string();
            assert_eq!(Dn::parse(&rendered).unwrap(), dn, "round trip of {input}");
        }
    }

    #[test]
    fn test_marker_value_roundtrips() {
        let dn = Dn::new(vec![Rdn::single("redacted", "{REDACTED}")]);
        let rendered = dn.to_string();
        assert_eq!(rendered, "redacted={REDACTED}");
        assert_eq!(Dn::parse(&rendered).unwrap(), dn);
    }
}
