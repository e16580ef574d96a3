use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::types::DocId;

/// Internal id → document bag. Documents are opaque JSON values; the core
/// only reads them through schema-path extraction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentStore {
    docs: HashMap<DocId, Value>,
}

impl DocumentStore {
    pub fn new() -> Self {
        DocumentStore::default()
    }

    pub fn insert(&mut self, id: DocId, document: Value) {
        self.docs.insert(id, document);
    }

    pub fn remove(&mut self, id: DocId) -> Option<Value> {
        self.docs.remove(&id)
    }

    pub fn get(&self, id: DocId) -> Option<&Value> {
        self.docs.get(&id)
    }

    pub fn count(&self) -> usize {
        self.docs.len()
    }

    pub fn ids(&self) -> impl Iterator<Item = DocId> + '_ {
        self.docs.keys().copied()
    }

    pub(crate) fn as_map(&self) -> &HashMap<DocId, Value> {
        &self.docs
    }

    pub(crate) fn from_map(docs: HashMap<DocId, Value>) -> Self {
        DocumentStore { docs }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_store_round_trip() {
        let mut store = DocumentStore::new();
        store.insert(DocId(1), json!({"title": "a"}));
        store.insert(DocId(2), json!({"title": "b"}));

        assert_eq!(store.count(), 2);
        assert_eq!(store.get(DocId(1)), Some(&json!({"title": "a"})));

        assert!(store.remove(DocId(1)).is_some());
        assert!(store.remove(DocId(1)).is_none());
        assert_eq!(store.count(), 1);
    }
}
