//! Selector parser
//!
//! Parses the five-kind selector grammar used by both extraction modes:
//! `*`, `tag`, `.class`, `#id`, `[attr]` and `[attr=value]`.

use thiserror::Error;

/// A parsed selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// `*` - matches every element
    Universal,
    /// `tag` - ASCII case-insensitive tag name match
    Tag(String),
    /// `.class` - class list membership, byte-exact
    Class(String),
    /// `#id` - id attribute equality, byte-exact
    Id(String),
    /// `[attr]` / `[attr=value]` - presence when `value` is empty,
    /// byte-exact equality otherwise
    Attribute { name: String, value: String },
}

/// Selector parse failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,
    #[error("invalid selector: {0}")]
    Invalid(String),
}

impl Selector {
    /// Canonical textual form, used to key streaming result lists
    pub fn key(&self) -> String {
        match self {
            Selector::Universal => "*".to_string(),
            Selector::Tag(tag) => tag.clone(),
            Selector::Class(class) => format!(".{class}"),
            Selector::Id(id) => format!("#{id}"),
            Selector::Attribute { name, value } if value.is_empty() => format!("[{name}]"),
            Selector::Attribute { name, value } => format!("[{name}={value}]"),
        }
    }
}

/// Parse a selector from its source string
pub fn parse(source: &str) -> Result<Selector, SelectorError> {
    let source = trim(source);
    if source.is_empty() {
        return Err(SelectorError::Empty);
    }
    if source == "*" {
        return Ok(Selector::Universal);
    }

    if let Some(name) = source.strip_prefix('#') {
        if name.is_empty() {
            return Err(SelectorError::Invalid("'#' needs an id".to_string()));
        }
        return Ok(Selector::Id(name.to_string()));
    }

    if let Some(name) = source.strip_prefix('.') {
        if name.is_empty() {
            return Err(SelectorError::Invalid("'.' needs a class".to_string()));
        }
        return Ok(Selector::Class(name.to_string()));
    }

    if let Some(rest) = source.strip_prefix('[') {
        let Some(close) = rest.find(']') else {
            return Err(SelectorError::Invalid("missing ']'".to_string()));
        };
        return parse_attribute(&rest[..close]);
    }

    Ok(Selector::Tag(source.to_string()))
}

/// Parse the contents between '[' and ']'
fn parse_attribute(inner: &str) -> Result<Selector, SelectorError> {
    let inner = trim(inner);
    let (name, value) = match inner.split_once('=') {
        Some((name, value)) => (trim(name), strip_quotes(trim(value))),
        None => (inner, ""),
    };
    if name.is_empty() {
        return Err(SelectorError::Invalid(
            "attribute selector needs a name".to_string(),
        ));
    }
    Ok(Selector::Attribute {
        name: name.to_string(),
        value: value.to_string(),
    })
}

/// Trim ASCII whitespace only
fn trim(s: &str) -> &str {
    s.trim_matches(|c: char| matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0c'))
}

/// Strip one outer matching quote pair, if present
fn strip_quotes(s: &str) -> &str {
    let bytes = s.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        if (first == b'"' || first == b'\'') && bytes[bytes.len() - 1] == first {
            return &s[1..s.len() - 1];
        }
    }
    s
}
