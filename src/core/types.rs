use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::schema::SchemaType;

/// Dense internal document id. Non-zero, assigned on first interning of an
/// external id, never reused after removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u64", into = "u64")]
pub struct DocId(pub u64);

impl DocId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for DocId {
    fn from(id: u64) -> Self {
        DocId(id)
    }
}

impl From<DocId> for u64 {
    fn from(id: DocId) -> u64 {
        id.0
    }
}

/// A scalar value pulled out of a document, typed per the schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Str(String),
    Num(f64),
    Bool(bool),
}

/// A schema-typed value extracted from a document at some flattened path.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Str(String),
    Num(f64),
    Bool(bool),
    StrArray(Vec<String>),
    NumArray(Vec<f64>),
    BoolArray(Vec<bool>),
}

impl FieldValue {
    /// Converts a raw JSON value to the typed form declared by the schema.
    /// Returns `None` when the value does not match the declared type.
    pub fn from_json(value: &Value, kind: SchemaType) -> Option<FieldValue> {
        match kind {
            SchemaType::String => value.as_str().map(|s| FieldValue::Str(s.to_string())),
            SchemaType::Number => value.as_f64().map(FieldValue::Num),
            SchemaType::Boolean => value.as_bool().map(FieldValue::Bool),
            SchemaType::StringArray => {
                let items = value.as_array()?;
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(item.as_str()?.to_string());
                }
                Some(FieldValue::StrArray(out))
            }
            SchemaType::NumberArray => {
                let items = value.as_array()?;
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(item.as_f64()?);
                }
                Some(FieldValue::NumArray(out))
            }
            SchemaType::BooleanArray => {
                let items = value.as_array()?;
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(item.as_bool()?);
                }
                Some(FieldValue::BoolArray(out))
            }
        }
    }

    /// The scalar form, when this is a scalar.
    pub fn as_scalar(&self) -> Option<ScalarValue> {
        match self {
            FieldValue::Str(s) => Some(ScalarValue::Str(s.clone())),
            FieldValue::Num(n) => Some(ScalarValue::Num(*n)),
            FieldValue::Bool(b) => Some(ScalarValue::Bool(*b)),
            _ => None,
        }
    }
}

/// Walks a dotted path ("author.name") through nested JSON objects.
pub fn value_at_path<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = doc;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}
