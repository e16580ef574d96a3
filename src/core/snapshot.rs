use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::analysis::language::Language;
use crate::core::id_store::IdStore;
use crate::core::types::DocId;
use crate::index::Index;
use crate::schema::schema::SchemaType;
use crate::sort::sorter::SortState;

/// Serializable image of a whole database.
///
/// Integer-keyed maps become objects whose string keys parse back to
/// integers, so the JSON form round-trips losslessly. The sorter is flushed
/// before capture: pending removals applied, every sort materialized.
#[derive(Debug, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(rename = "internalDocumentIdStore")]
    pub internal_document_id_store: IdStore,
    pub index: Index,
    pub sorter: SorterSnapshot,
    pub docs: DocsSnapshot,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SorterSnapshot {
    #[serde(rename = "sortableProperties")]
    pub sortable_properties: Vec<String>,
    #[serde(rename = "sortablePropertiesWithTypes")]
    pub sortable_properties_with_types: HashMap<String, SchemaType>,
    pub sorts: HashMap<String, SortState>,
    pub enabled: bool,
    #[serde(rename = "isSorted")]
    pub is_sorted: bool,
    pub language: Language,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DocsSnapshot {
    pub docs: HashMap<DocId, Value>,
    pub count: usize,
}
