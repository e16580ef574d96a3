use serde::{Deserialize, Serialize};

use crate::core::types::DocId;

/// Boolean index: one bucket of internal ids per truth value, in insertion
/// order. Removal is a linear scan, which is fine at two buckets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoolIndex {
    #[serde(rename = "true")]
    true_ids: Vec<DocId>,
    #[serde(rename = "false")]
    false_ids: Vec<DocId>,
}

impl BoolIndex {
    pub fn new() -> Self {
        BoolIndex::default()
    }

    pub fn insert(&mut self, id: DocId, value: bool) {
        let bucket = if value {
            &mut self.true_ids
        } else {
            &mut self.false_ids
        };
        if !bucket.contains(&id) {
            bucket.push(id);
        }
    }

    pub fn remove(&mut self, id: DocId, value: bool) {
        let bucket = if value {
            &mut self.true_ids
        } else {
            &mut self.false_ids
        };
        bucket.retain(|existing| *existing != id);
    }

    pub fn get(&self, value: bool) -> &[DocId] {
        if value {
            &self.true_ids
        } else {
            &self.false_ids
        }
    }
}
