use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{value_at_path, FieldValue};

/// The type of a single flattened schema path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchemaType {
    #[serde(rename = "string")]
    String,
    #[serde(rename = "number")]
    Number,
    #[serde(rename = "boolean")]
    Boolean,
    #[serde(rename = "string[]")]
    StringArray,
    #[serde(rename = "number[]")]
    NumberArray,
    #[serde(rename = "boolean[]")]
    BooleanArray,
}

impl SchemaType {
    pub fn parse(raw: &str) -> Option<SchemaType> {
        match raw {
            "string" => Some(SchemaType::String),
            "number" => Some(SchemaType::Number),
            "boolean" => Some(SchemaType::Boolean),
            "string[]" => Some(SchemaType::StringArray),
            "number[]" => Some(SchemaType::NumberArray),
            "boolean[]" => Some(SchemaType::BooleanArray),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaType::String => "string",
            SchemaType::Number => "number",
            SchemaType::Boolean => "boolean",
            SchemaType::StringArray => "string[]",
            SchemaType::NumberArray => "number[]",
            SchemaType::BooleanArray => "boolean[]",
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(
            self,
            SchemaType::StringArray | SchemaType::NumberArray | SchemaType::BooleanArray
        )
    }

    /// Scalar element type backing this path's index structure.
    pub fn element(&self) -> SchemaType {
        match self {
            SchemaType::StringArray => SchemaType::String,
            SchemaType::NumberArray => SchemaType::Number,
            SchemaType::BooleanArray => SchemaType::Boolean,
            scalar => *scalar,
        }
    }
}

/// Flattened document schema: dotted property paths mapped to types.
///
/// Nested definitions are flattened at parse time, so `{"author": {"name":
/// "string"}}` indexes under `author.name`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    properties: BTreeMap<String, SchemaType>,
}

impl Schema {
    /// Parses a JSON-style schema definition.
    ///
    /// Accepts type names (`"string"`, `"number[]"`, ...) and nested objects.
    /// Anything else fails with `INVALID_SCHEMA_TYPE`.
    pub fn parse(definition: &Value) -> Result<Schema> {
        let mut properties = BTreeMap::new();
        let root = definition.as_object().ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidSchemaType,
                "schema definition must be an object",
            )
        })?;
        flatten_into(&mut properties, root, "")?;
        Ok(Schema { properties })
    }

    pub fn get(&self, path: &str) -> Option<SchemaType> {
        self.properties.get(path).copied()
    }

    pub fn properties(&self) -> impl Iterator<Item = (&String, &SchemaType)> {
        self.properties.iter()
    }

    pub fn paths(&self) -> Vec<String> {
        self.properties.keys().cloned().collect()
    }

    /// Checks every schema path present in the document against its declared
    /// type. Absent paths are allowed; mistyped values are not.
    pub fn validate_document(&self, doc: &Value) -> Result<()> {
        for (path, kind) in &self.properties {
            if let Some(raw) = value_at_path(doc, path) {
                if FieldValue::from_json(raw, *kind).is_none() {
                    return Err(Error::new(
                        ErrorKind::SchemaValidationFailure,
                        format!(
                            "expected \"{}\" on property \"{}\", got {}",
                            kind.as_str(),
                            path,
                            raw
                        ),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Extracts every typed value the document provides for schema paths.
    pub fn extract<'a>(&'a self, doc: &Value) -> Vec<(&'a str, FieldValue)> {
        let mut out = Vec::new();
        for (path, kind) in &self.properties {
            if let Some(raw) = value_at_path(doc, path) {
                if let Some(value) = FieldValue::from_json(raw, *kind) {
                    out.push((path.as_str(), value));
                }
            }
        }
        out
    }
}

fn flatten_into(
    properties: &mut BTreeMap<String, SchemaType>,
    object: &serde_json::Map<String, Value>,
    prefix: &str,
) -> Result<()> {
    for (key, value) in object {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        match value {
            Value::String(raw) => match SchemaType::parse(raw) {
                Some(kind) => {
                    properties.insert(path, kind);
                }
                None => {
                    return Err(Error::new(
                        ErrorKind::InvalidSchemaType,
                        format!("unsupported type \"{}\" on property \"{}\"", raw, path),
                    ));
                }
            },
            Value::Object(nested) => flatten_into(properties, nested, &path)?,
            other => {
                return Err(Error::new(
                    ErrorKind::InvalidSchemaType,
                    format!("unsupported type {} on property \"{}\"", other, path),
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flattens_nested_definitions() {
        let schema = Schema::parse(&json!({
            "title": "string",
            "meta": {
                "rating": "number",
                "flags": { "featured": "boolean" }
            },
            "tags": "string[]"
        }))
        .unwrap();

        assert_eq!(schema.get("title"), Some(SchemaType::String));
        assert_eq!(schema.get("meta.rating"), Some(SchemaType::Number));
        assert_eq!(schema.get("meta.flags.featured"), Some(SchemaType::Boolean));
        assert_eq!(schema.get("tags"), Some(SchemaType::StringArray));
        assert_eq!(schema.get("meta"), None);
    }

    #[test]
    fn test_rejects_unknown_types() {
        let err = Schema::parse(&json!({"embedding": "vector[]"})).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidSchemaType);

        let err = Schema::parse(&json!({"count": 3})).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidSchemaType);
    }

    #[test]
    fn test_document_validation() {
        let schema = Schema::parse(&json!({"title": "string", "price": "number"})).unwrap();

        assert!(schema.validate_document(&json!({"title": "ok"})).is_ok());
        assert!(schema
            .validate_document(&json!({"title": "ok", "price": 9.5}))
            .is_ok());

        let err = schema
            .validate_document(&json!({"title": "ok", "price": "cheap"}))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::SchemaValidationFailure);
    }

    #[test]
    fn test_extract_skips_absent_paths() {
        let schema =
            Schema::parse(&json!({"title": "string", "meta": {"rating": "number"}})).unwrap();
        let extracted = schema.extract(&json!({"title": "hello"}));
        assert_eq!(extracted.len(), 1);
        assert_eq!(extracted[0].0, "title");
    }
}
