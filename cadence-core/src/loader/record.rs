//! `key: value` records as they appear in the source document.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

/// Value of one record field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RawValue {
    Text(String),
    List(Vec<String>),
}

impl RawValue {
    /// Parses a trimmed value, turning `[a, b]` into a list.
    ///
    /// Items may be separated by `,` or `;`. They are trimmed but otherwise
    /// kept as written, blanks included.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        match value
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
        {
            Some(inner) if inner.trim().is_empty() => RawValue::List(Vec::new()),
            Some(inner) => RawValue::List(
                inner
                    .split([',', ';'])
                    .map(|s| s.trim().to_string())
                    .collect(),
            ),
            None => RawValue::Text(value.to_string()),
        }
    }

    /// True for a scalar with nothing but whitespace, such as the `itens:`
    /// line that heads a bulleted list.
    pub fn is_blank(&self) -> bool {
        matches!(self, RawValue::Text(text) if text.trim().is_empty())
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Text(text) => write!(f, "{text:?}"),
            RawValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item:?}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// One bullet record: lowercased keys in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RawRecord {
    fields: IndexMap<String, RawValue>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a `key: value` line into this record.
    ///
    /// Lines without a colon or with a blank key are ignored. A repeated key
    /// overwrites the earlier value and keeps its position.
    pub fn insert_line(&mut self, line: &str) -> bool {
        match parse_key_value(line) {
            Some((key, value)) => {
                self.insert(key, value);
                true
            }
            None => false,
        }
    }

    pub fn insert(&mut self, key: String, value: RawValue) {
        self.fields.insert(key, value);
    }

    /// Appends one item to a list field written as indented bullets.
    ///
    /// A blank scalar becomes a one-item list. Returns false when `key` is
    /// absent or holds non-blank text.
    pub fn push_list_item(&mut self, key: &str, item: &str) -> bool {
        let Some(value) = self.fields.get_mut(key) else {
            return false;
        };
        let item = item.trim().to_string();
        if value.is_blank() {
            *value = RawValue::List(vec![item]);
            return true;
        }
        match value {
            RawValue::List(items) => {
                items.push(item);
                true
            }
            RawValue::Text(_) => false,
        }
    }

    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.fields.get(key)
    }

    /// Trimmed text of a scalar field; absent or list-valued fields give `""`.
    pub fn text(&self, key: &str) -> &str {
        match self.fields.get(key) {
            Some(RawValue::Text(text)) => text.trim(),
            _ => "",
        }
    }

    /// Items of a list field. A non-blank scalar counts as a one-item list.
    pub fn list(&self, key: &str) -> Vec<String> {
        match self.fields.get(key) {
            Some(RawValue::List(items)) => items.iter().map(|i| i.trim().to_string()).collect(),
            Some(RawValue::Text(text)) if !text.trim().is_empty() => vec![text.trim().to_string()],
            _ => Vec::new(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Display for RawRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}: {value}")?;
        }
        f.write_str("}")
    }
}

/// Splits `key: value` at the first colon, lowercasing the key.
pub fn parse_key_value(line: &str) -> Option<(String, RawValue)> {
    let (key, value) = line.split_once(':')?;
    let key = key.trim().to_lowercase();
    if key.is_empty() {
        return None;
    }
    Some((key, RawValue::parse(value)))
}
