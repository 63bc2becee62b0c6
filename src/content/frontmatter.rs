//! Front-matter parsing
//!
//! Content files start with an optional header block delimited by `---`
//! lines, in the same convention static-site generators use:
//!
//! ```text
//! ---
//! title: "Spring seminar"
//! date: 2025-06-14
//! tag: [seminar, finance]
//! ---
//! Body text...
//! ```
//!
//! The header is deliberately not full YAML: one `key: value` pair per
//! line, with a bracketed comma-separated form for lists. Anything the
//! parser does not understand is skipped, never an error — the content
//! source is hand-maintained files, and a half-parsed header is more
//! useful than a failed render.

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    /// Matches a leading `---` block and captures (header, body).
    static ref FRONT_MATTER_RE: Regex =
        Regex::new(r"(?s)\A---[ \t\r]*\n(.*?)\n---[ \t\r]*\n(.*)\z").unwrap();
}

/// A single front-matter value: a scalar string or an ordered list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Scalar(String),
    List(Vec<String>),
}

impl Value {
    /// Resolve to a plain string; lists are joined with `", "`.
    pub fn to_joined(&self) -> String {
        match self {
            Value::Scalar(s) => s.clone(),
            Value::List(items) => items.join(", "),
        }
    }
}

/// Parsed front-matter data: an insertion-ordered key/value mapping.
///
/// Duplicate keys follow mapping semantics (last occurrence wins) while
/// keeping the position of the first occurrence.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct FrontMatter {
    fields: IndexMap<String, Value>,
}

impl FrontMatter {
    /// Parse front-matter from a content string.
    ///
    /// Returns the parsed header and the remaining body. When the text
    /// does not start with a complete `---`-delimited header, the header
    /// is empty and the body is the whole input. Never fails.
    pub fn parse(text: &str) -> (Self, &str) {
        let Some(caps) = FRONT_MATTER_RE.captures(text) else {
            return (FrontMatter::default(), text);
        };

        let header = caps.get(1).map_or("", |m| m.as_str());
        let body = caps.get(2).map_or("", |m| m.as_str());

        let mut fields = IndexMap::new();
        for line in header.lines() {
            let Some((key, raw)) = line.split_once(':') else {
                // Not a key/value line; skipped on purpose.
                if !line.trim().is_empty() {
                    tracing::debug!("skipping front-matter line without colon: {:?}", line);
                }
                continue;
            };

            let key = key.trim();
            if key.is_empty() {
                continue;
            }

            fields.insert(key.to_string(), parse_value(raw.trim()));
        }

        (Self { fields }, body)
    }

    /// Look up a raw value by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Resolve a key to a display string.
    ///
    /// Missing keys resolve to the empty string; list values are joined
    /// with `", "`.
    pub fn resolve(&self, key: &str) -> String {
        self.fields.get(key).map(Value::to_joined).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Iterate entries in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Parse the right-hand side of a `key: value` line.
fn parse_value(raw: &str) -> Value {
    // Bracketed form: [a, b, c] -> ordered list
    if let Some(inner) = raw
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    {
        let items = inner
            .split(',')
            .map(|item| item.trim().to_string())
            .collect();
        return Value::List(items);
    }

    // A single surrounding pair of double quotes is stripped.
    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        return Value::Scalar(raw[1..raw.len() - 1].to_string());
    }

    Value::Scalar(raw.to_string())
}
