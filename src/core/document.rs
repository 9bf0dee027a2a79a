//! In-memory document model shared by the JSON and YAML front-ends.
//!
//! Both parsers produce their own value type; we normalise them into a single
//! [`Document`] so the tree builder only has to understand one shape.  Object
//! entries are kept in a `Vec` so iteration order is exactly file order.

use std::fmt;

// ───────────────────────────────────────── types ─────────────

/// A leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    /// Kept as written so `1.50` doesn't turn into `1.5`.
    Number(String),
    String(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => f.write_str("null"),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Number(n) => f.write_str(n),
            Scalar::String(s) => f.write_str(s),
        }
    }
}

/// A parsed JSON/YAML value.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Object(Vec<(String, Document)>),
    Array(Vec<Document>),
    Scalar(Scalar),
}

/// Coarse kind of a [`Document`] value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Object,
    Array,
    Scalar,
}

impl Document {
    pub fn kind(&self) -> ValueKind {
        match self {
            Document::Object(_) => ValueKind::Object,
            Document::Array(_) => ValueKind::Array,
            Document::Scalar(_) => ValueKind::Scalar,
        }
    }

    /// Text shown for a value rendered on a single row.
    ///
    /// Scalars print bare (`Ford`, `30`, `null`); containers print as
    /// compact JSON.
    pub fn display_text(&self) -> String {
        match self {
            Document::Scalar(s) => s.to_string(),
            other => serde_json::Value::from(other).to_string(),
        }
    }

    /// Total number of values in this document (containers included).
    pub fn value_count(&self) -> usize {
        match self {
            Document::Object(entries) => {
                1 + entries.iter().map(|(_, v)| v.value_count()).sum::<usize>()
            }
            Document::Array(items) => 1 + items.iter().map(Document::value_count).sum::<usize>(),
            Document::Scalar(_) => 1,
        }
    }
}

// ───────────────────────────────────────── serde_json ────────

impl From<serde_json::Value> for Document {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Document::Scalar(Scalar::Null),
            Value::Bool(b) => Document::Scalar(Scalar::Bool(b)),
            Value::Number(n) => Document::Scalar(Scalar::Number(n.to_string())),
            Value::String(s) => Document::Scalar(Scalar::String(s)),
            Value::Array(items) => Document::Array(items.into_iter().map(Document::from).collect()),
            Value::Object(map) => Document::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Document::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&Document> for serde_json::Value {
    fn from(doc: &Document) -> Self {
        use serde_json::Value;
        match doc {
            Document::Scalar(Scalar::Null) => Value::Null,
            Document::Scalar(Scalar::Bool(b)) => Value::Bool(*b),
            Document::Scalar(Scalar::Number(n)) => n
                .parse::<serde_json::Number>()
                .map(Value::Number)
                .unwrap_or_else(|_| Value::String(n.clone())),
            Document::Scalar(Scalar::String(s)) => Value::String(s.clone()),
            Document::Array(items) => Value::Array(items.iter().map(Value::from).collect()),
            Document::Object(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

// ───────────────────────────────────────── serde_yaml ────────

impl From<serde_yaml::Value> for Document {
    fn from(value: serde_yaml::Value) -> Self {
        use serde_yaml::Value;
        match value {
            Value::Null => Document::Scalar(Scalar::Null),
            Value::Bool(b) => Document::Scalar(Scalar::Bool(b)),
            Value::Number(n) => Document::Scalar(Scalar::Number(n.to_string())),
            Value::String(s) => Document::Scalar(Scalar::String(s)),
            Value::Sequence(items) => {
                Document::Array(items.into_iter().map(Document::from).collect())
            }
            Value::Mapping(map) => Document::Object(
                map.into_iter()
                    .map(|(k, v)| (yaml_key_text(k), Document::from(v)))
                    .collect(),
            ),
            // Tags are data, never instructions: keep the payload, drop the tag.
            Value::Tagged(tagged) => Document::from(tagged.value),
        }
    }
}

/// YAML allows any value as a mapping key; rows need a string label.
fn yaml_key_text(key: serde_yaml::Value) -> String {
    match Document::from(key) {
        Document::Scalar(s) => s.to_string(),
        other => other.display_text(),
    }
}
