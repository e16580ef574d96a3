use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::types::DocId;

/// Interns external document ids into dense internal ids.
///
/// Internal ids start at 1 and are never reused: removing a document leaves
/// its slot in place so ids stay stable across the database's lifetime and
/// across snapshots.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdStore {
    #[serde(rename = "internalIdToId")]
    internal_to_external: Vec<String>,
    #[serde(skip)]
    external_to_internal: HashMap<String, DocId>,
}

impl IdStore {
    pub fn new() -> Self {
        IdStore::default()
    }

    /// Returns the internal id for `external`, assigning the next dense id
    /// on first sight.
    pub fn intern(&mut self, external: &str) -> DocId {
        if let Some(id) = self.external_to_internal.get(external) {
            return *id;
        }
        self.internal_to_external.push(external.to_string());
        let id = DocId(self.internal_to_external.len() as u64);
        self.external_to_internal.insert(external.to_string(), id);
        id
    }

    pub fn get(&self, external: &str) -> Option<DocId> {
        self.external_to_internal.get(external).copied()
    }

    pub fn external_of(&self, id: DocId) -> Option<&str> {
        self.internal_to_external
            .get(id.0.checked_sub(1)? as usize)
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.internal_to_external.len()
    }

    pub fn is_empty(&self) -> bool {
        self.internal_to_external.is_empty()
    }

    /// Rebuilds the reverse map after deserialization; only the dense array
    /// is persisted.
    pub fn rebuild(&mut self) {
        self.external_to_internal = self
            .internal_to_external
            .iter()
            .enumerate()
            .map(|(index, external)| (external.clone(), DocId(index as u64 + 1)))
            .collect();
    }
}
