use std::collections::HashMap;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::search::facets::FacetResult;

/// A matched document, materialized from the document store.
#[derive(Debug, Clone, Serialize)]
pub struct Hit {
    pub id: String,
    pub score: f32,
    pub document: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct Elapsed {
    /// Nanoseconds.
    pub raw: u128,
    pub formatted: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub elapsed: Elapsed,
    /// Total matches before pagination.
    pub count: usize,
    pub hits: Vec<Hit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facets: Option<HashMap<String, FacetResult>>,
}

/// Default elapsed-time formatting: the largest unit that keeps the value
/// above 1.
pub fn format_elapsed(duration: Duration) -> String {
    let nanos = duration.as_nanos();
    if nanos < 1_000 {
        format!("{}ns", nanos)
    } else if nanos < 1_000_000 {
        format!("{}μs", nanos / 1_000)
    } else if nanos < 1_000_000_000 {
        format!("{}ms", nanos / 1_000_000)
    } else {
        format!("{}s", nanos / 1_000_000_000)
    }
}
