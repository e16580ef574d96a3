use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{value_at_path, DocId};
use crate::schema::schema::{Schema, SchemaType};

/// Facet request for one property.
///
/// String and boolean properties count distinct values; number properties
/// count hits per configured range.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FacetParams {
    pub ranges: Option<Vec<FacetRange>>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FacetRange {
    pub from: f64,
    pub to: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FacetResult {
    /// Number of distinct buckets.
    pub count: usize,
    pub values: BTreeMap<String, usize>,
}

/// Counts facet buckets over the (pre-pagination) result documents.
pub fn compute_facets(
    config: &HashMap<String, FacetParams>,
    schema: &Schema,
    documents: &[(DocId, &Value)],
) -> Result<HashMap<String, FacetResult>> {
    let mut out = HashMap::new();

    for (property, params) in config {
        let kind = schema.get(property).ok_or_else(|| {
            Error::new(
                ErrorKind::UnknownFilterProperty,
                format!("unknown facet property \"{}\"", property),
            )
        })?;

        let mut result = FacetResult::default();
        if kind.element() == SchemaType::Number {
            // Ranges must be declared up front so empty buckets still show.
            if let Some(ranges) = &params.ranges {
                for range in ranges {
                    result
                        .values
                        .insert(range_label(range), 0);
                }
            }
        }

        for (_, document) in documents {
            let Some(raw) = value_at_path(document, property) else {
                continue;
            };
            match kind.element() {
                SchemaType::String => {
                    for value in string_values(raw, kind) {
                        *result.values.entry(value).or_insert(0) += 1;
                    }
                }
                SchemaType::Boolean => {
                    for value in bool_values(raw, kind) {
                        *result.values.entry(value.to_string()).or_insert(0) += 1;
                    }
                }
                SchemaType::Number => {
                    let Some(ranges) = &params.ranges else { continue };
                    for value in number_values(raw, kind) {
                        for range in ranges {
                            if value >= range.from && value <= range.to {
                                *result.values.entry(range_label(range)).or_insert(0) += 1;
                            }
                        }
                    }
                }
                _ => {}
            }
        }

        if let Some(limit) = params.limit {
            if result.values.len() > limit {
                let keep: Vec<String> = top_buckets(&result.values, limit);
                result.values.retain(|key, _| keep.contains(key));
            }
        }

        result.count = result.values.len();
        out.insert(property.clone(), result);
    }

    Ok(out)
}

fn range_label(range: &FacetRange) -> String {
    format!("{}-{}", range.from, range.to)
}

fn top_buckets(values: &BTreeMap<String, usize>, limit: usize) -> Vec<String> {
    let mut entries: Vec<(&String, &usize)> = values.iter().collect();
    entries.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    entries
        .into_iter()
        .take(limit)
        .map(|(key, _)| key.clone())
        .collect()
}

fn string_values(raw: &Value, kind: SchemaType) -> Vec<String> {
    if kind.is_array() {
        raw.as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    } else {
        raw.as_str().map(str::to_string).into_iter().collect()
    }
}

fn bool_values(raw: &Value, kind: SchemaType) -> Vec<bool> {
    if kind.is_array() {
        raw.as_array()
            .map(|items| items.iter().filter_map(Value::as_bool).collect())
            .unwrap_or_default()
    } else {
        raw.as_bool().into_iter().collect()
    }
}

fn number_values(raw: &Value, kind: SchemaType) -> Vec<f64> {
    if kind.is_array() {
        raw.as_array()
            .map(|items| items.iter().filter_map(Value::as_f64).collect())
            .unwrap_or_default()
    } else {
        raw.as_f64().into_iter().collect()
    }
}
