//! Search filter AST and RFC 4515 string form.
//!
//! Assertion values escape `(`, `)`, `*`, `\`, and NUL as two-digit hex
//! pairs (`\28` and so on); every other character, including `{` and `}`,
//! passes through unescaped, so redaction and tokenization markers embed
//! without disturbing the grammar.

use crate::error::{LdapParseError, Result};
use std::fmt;

/// A search filter expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// `(&(...)(...))` — all children must match. Zero children is the
    /// LDAP absolute-true filter.
    And(Vec<Filter>),
    /// `(|(...)(...))` — any child must match.
    Or(Vec<Filter>),
    /// `(!(...))` — the child must not match.
    Not(Box<Filter>),
    /// `(attr=*)` — the attribute is present. Carries no assertion value.
    Presence {
        /// The attribute type.
        attribute: String,
    },
    /// `(attr=value)`.
    Equality {
        /// The attribute type.
        attribute: String,
        /// The assertion value, unescaped.
        value: String,
    },
    /// `(attr>=value)`.
    GreaterOrEqual {
        /// The attribute type.
        attribute: String,
        /// The assertion value, unescaped.
        value: String,
    },
    /// `(attr<=value)`.
    LessOrEqual {
        /// The attribute type.
        attribute: String,
        /// The assertion value, unescaped.
        value: String,
    },
    /// `(attr~=value)`.
    Approximate {
        /// The attribute type.
        attribute: String,
        /// The assertion value, unescaped.
        value: String,
    },
    /// `(attr=initial*any*final)` — `*`-separated substring components.
    Substring {
        /// The attribute type.
        attribute: String,
        /// Component before the first `*`, when non-empty.
        sub_initial: Option<String>,
        /// Components between `*` separators, in order.
        sub_any: Vec<String>,
        /// Component after the last `*`, when non-empty.
        sub_final: Option<String>,
    },
    /// `(attr:dn:rule:=value)` — extensible match. At least one of
    /// `attribute` and `matching_rule_id` is present.
    ExtensibleMatch {
        /// The attribute type, when named.
        attribute: Option<String>,
        /// The matching rule OID or descriptor, when given.
        matching_rule_id: Option<String>,
        /// Whether DN attributes participate in matching (`:dn:`).
        dn_attributes: bool,
        /// The assertion value, unescaped.
        value: String,
    },
}

impl Filter {
    /// Parse the RFC 4515 string form of a filter.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let (filter, rest) = parse_component(s)?;
        if !rest.is_empty() {
            return Err(LdapParseError::InvalidFilter(format!(
                "trailing content after filter: '{}'",
                rest
            )));
        }
        Ok(filter)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::And(children) => write_composite(f, '&', children),
            Filter::Or(children) => write_composite(f, '|', children),
            Filter::Not(child) => write!(f, "(!{})", child),
            Filter::Presence { attribute } => write!(f, "({}=*)", attribute),
            Filter::Equality { attribute, value } => {
                write!(f, "({}={})", attribute, EscapedValue(value))
            }
            Filter::GreaterOrEqual { attribute, value } => {
                write!(f, "({}>={})", attribute, EscapedValue(value))
            }
            Filter::LessOrEqual { attribute, value } => {
                write!(f, "({}<={})", attribute, EscapedValue(value))
            }
            Filter::Approximate { attribute, value } => {
                write!(f, "({}~={})", attribute, EscapedValue(value))
            }
            Filter::Substring {
                attribute,
                sub_initial,
                sub_any,
                sub_final,
            } => {
                write!(f, "({}=", attribute)?;
                if let Some(initial) = sub_initial {
                    write!(f, "{}", EscapedValue(initial))?;
                }
                for any in sub_any {
                    write!(f, "*{}", EscapedValue(any))?;
                }
                write!(f, "*")?;
                if let Some(last) = sub_final {
                    write!(f, "{}", EscapedValue(last))?;
                }
                write!(f, ")")
            }
            Filter::ExtensibleMatch {
                attribute,
                matching_rule_id,
                dn_attributes,
                value,
            } => {
                write!(f, "(")?;
                if let Some(attr) = attribute {
                    write!(f, "{}", attr)?;
                }
                if *dn_attributes {
                    write!(f, ":dn")?;
                }
                if let Some(rule) = matching_rule_id {
                    write!(f, ":{}", rule)?;
                }
                write!(f, ":={})", EscapedValue(value))
            }
        }
    }
}

fn write_composite(f: &mut fmt::Formatter<'_>, op: char, children: &[Filter]) -> fmt::Result {
    write!(f, "({}", op)?;
    for child in children {
        write!(f, "{}", child)?;
    }
    write!(f, ")")
}

struct EscapedValue<'a>(&'a str);

impl fmt::Display for EscapedValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.0.chars() {
            match c {
                '(' => f.write_str("\\28")?,
                ')' => f.write_str("\\29")?,
                '*' => f.write_str("\\2a")?,
                '\\' => f.write_str("\\5c")?,
                '\0' => f.write_str("\\00")?,
                c => f.write_fmt(format_args!("{}", c))?,
            }
        }
        Ok(())
    }
}

fn parse_component(s: &str) -> Result<(Filter, &str)> {
    if !s.starts_with('(') {
        return Err(LdapParseError::InvalidFilter(format!(
            "expected '(' at '{}'",
            s
        )));
    }

    let close = find_matching_paren(s)?;
    let content = &s[1..close];
    let rest = &s[close + 1..];

    let filter = match content.chars().next() {
        Some('&') => Filter::And(parse_children(&content[1..])?),
        Some('|') => Filter::Or(parse_children(&content[1..])?),
        Some('!') => {
            let children = parse_children(&content[1..])?;
            if children.len() != 1 {
                return Err(LdapParseError::InvalidFilter(
                    "NOT filter must have exactly one child".to_string(),
                ));
            }
            Filter::Not(Box::new(children.into_iter().next().unwrap()))
        }
        Some(_) => parse_leaf(content)?,
        None => {
            return Err(LdapParseError::InvalidFilter(
                "empty filter component".to_string(),
            ))
        }
    };

    Ok((filter, rest))
}

fn find_matching_paren(s: &str) -> Result<usize> {
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(i);
                }
            }
            _ => {}
        }
    }
    Err(LdapParseError::InvalidFilter(
        "unbalanced parentheses".to_string(),
    ))
}

fn parse_children(mut s: &str) -> Result<Vec<Filter>> {
    let mut children = Vec::new();
    while !s.is_empty() {
        let (child, rest) = parse_component(s)?;
        children.push(child);
        s = rest;
    }
    Ok(children)
}

fn parse_leaf(content: &str) -> Result<Filter> {
    let eq = content.find('=').ok_or_else(|| {
        LdapParseError::InvalidFilter(format!("component '{}' has no '='", content))
    })?;
    if eq == 0 {
        return Err(LdapParseError::InvalidFilter(
            "component starts with '='".to_string(),
        ));
    }

    let lhs = &content[..eq];
    let rhs = &content[eq + 1..];

    match lhs.as_bytes()[eq - 1] {
        b'>' => {
            return Ok(Filter::GreaterOrEqual {
                attribute: require_attribute(&lhs[..eq - 1])?,
                value: unescape_value(rhs)?,
            })
        }
        b'<' => {
            return Ok(Filter::LessOrEqual {
                attribute: require_attribute(&lhs[..eq - 1])?,
                value: unescape_value(rhs)?,
            })
        }
        b'~' => {
            return Ok(Filter::Approximate {
                attribute: require_attribute(&lhs[..eq - 1])?,
                value: unescape_value(rhs)?,
            })
        }
        b':' => return parse_extensible(&lhs[..eq - 1], rhs),
        _ => {}
    }

    let attribute = require_attribute(lhs)?;

    if rhs == "*" {
        return Ok(Filter::Presence { attribute });
    }

    if rhs.contains('*') {
        return parse_substring(attribute, rhs);
    }

    Ok(Filter::Equality {
        attribute,
        value: unescape_value(rhs)?,
    })
}

fn parse_substring(attribute: String, rhs: &str) -> Result<Filter> {
    let parts: Vec<&str> = rhs.split('*').collect();

    let sub_initial = non_empty(parts[0])?;
    let sub_final = non_empty(parts[parts.len() - 1])?;
    let mut sub_any = Vec::new();
    for part in &parts[1..parts.len() - 1] {
        if part.is_empty() {
            return Err(LdapParseError::InvalidFilter(
                "empty substring component between '*' separators".to_string(),
            ));
        }
        sub_any.push(unescape_value(part)?);
    }

    Ok(Filter::Substring {
        attribute,
        sub_initial,
        sub_any,
        sub_final,
    })
}

fn non_empty(part: &str) -> Result<Option<String>> {
    if part.is_empty() {
        Ok(None)
    } else {
        Ok(Some(unescape_value(part)?))
    }
}

fn parse_extensible(lhs: &str, rhs: &str) -> Result<Filter> {
    let mut segments = lhs.split(':');
    let attr_part = segments.next().unwrap_or("");
    let attribute = if attr_part.is_empty() {
        None
    } else {
        Some(require_attribute(attr_part)?)
    };

    let mut dn_attributes = false;
    let mut matching_rule_id = None;
    for segment in segments {
        if segment.eq_ignore_ascii_case("dn") && !dn_attributes {
            dn_attributes = true;
        } else if matching_rule_id.is_none() && !segment.is_empty() {
            matching_rule_id = Some(segment.to_string());
        } else {
            return Err(LdapParseError::InvalidFilter(format!(
                "invalid extensible match element '{}'",
                segment
            )));
        }
    }

    if attribute.is_none() && matching_rule_id.is_none() {
        return Err(LdapParseError::InvalidFilter(
            "extensible match needs an attribute or a matching rule".to_string(),
        ));
    }

    Ok(Filter::ExtensibleMatch {
        attribute,
        matching_rule_id,
        dn_attributes,
        value: unescape_value(rhs)?,
    })
}

fn require_attribute(s: &str) -> Result<String> {
    if s.is_empty()
        || !s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.' || c == ';')
    {
        return Err(LdapParseError::InvalidFilter(format!(
            "invalid attribute type '{}'",
            s
        )));
    }
    Ok(s.to_string())
}

/// Unescape an assertion value: every backslash introduces exactly one
/// two-digit hex pair.
fn unescape_value(raw: &str) -> Result<String> {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' {
            if i + 2 >= bytes.len()
                || !bytes[i + 1].is_ascii_hexdigit()
                || !bytes[i + 2].is_ascii_hexdigit()
            {
                return Err(LdapParseError::InvalidFilter(
                    "backslash must introduce a two-digit hex escape".to_string(),
                ));
            }
            out.push((hex_digit(bytes[i + 1]) << 4) | hex_digit(bytes[i + 2]));
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out)
        .map_err(|_| LdapParseError::InvalidFilter("escaped value is not valid UTF-8".to_string()))
}

fn hex_digit(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        _ => b - b'A' + 10,
    }
}
