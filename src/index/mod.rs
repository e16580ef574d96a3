pub mod avl;
pub mod boolean;
pub mod radix;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::analysis::tokenizer::Tokenizer;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{DocId, FieldValue};
use crate::index::avl::AvlTree;
use crate::index::boolean::BoolIndex;
use crate::index::radix::{FindParams, RadixTree};
use crate::schema::schema::{Schema, SchemaType};
use crate::scoring::bm25::{bm25, BM25Params};
use crate::search::params::{ComparisonOp, WhereClause, WhereFilter};

/// The structure backing one schema path, keyed by its scalar type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "node")]
pub enum PropertyIndex {
    #[serde(rename = "radix")]
    Radix(RadixTree),
    #[serde(rename = "avl")]
    Avl(AvlTree),
    #[serde(rename = "bool")]
    Bool(BoolIndex),
}

/// Per-property index structures plus the BM25 bookkeeping for string paths.
///
/// Invariants maintained across insert/remove:
/// - `avg_field_length[p] * |field_lengths[p]| == Σ field_lengths[p][d]`
/// - `token_occurrences[p][t] == |{d : frequencies[p][d][t] > 0}|`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Index {
    indexes: HashMap<String, PropertyIndex>,
    #[serde(rename = "searchableProperties")]
    searchable_properties: Vec<String>,
    #[serde(rename = "searchablePropertiesWithTypes")]
    searchable_properties_with_types: HashMap<String, SchemaType>,
    frequencies: HashMap<String, HashMap<DocId, HashMap<String, f64>>>,
    #[serde(rename = "tokenOccurrences")]
    token_occurrences: HashMap<String, HashMap<String, u32>>,
    #[serde(rename = "avgFieldLength")]
    avg_field_length: HashMap<String, f64>,
    #[serde(rename = "fieldLengths")]
    field_lengths: HashMap<String, HashMap<DocId, usize>>,
}

impl Index {
    /// Builds one structure per flattened schema path.
    pub fn from_schema(schema: &Schema) -> Self {
        let mut index = Index::default();
        for (path, kind) in schema.properties() {
            let structure = match kind.element() {
                SchemaType::String => PropertyIndex::Radix(RadixTree::new()),
                SchemaType::Number => PropertyIndex::Avl(AvlTree::new()),
                SchemaType::Boolean => PropertyIndex::Bool(BoolIndex::new()),
                _ => unreachable!("element() always yields a scalar"),
            };
            index.indexes.insert(path.clone(), structure);
            index.searchable_properties.push(path.clone());
            index
                .searchable_properties_with_types
                .insert(path.clone(), *kind);
        }
        index
    }

    pub fn searchable_properties(&self) -> &[String] {
        &self.searchable_properties
    }

    /// Paths that participate in free-text search.
    pub fn string_properties(&self) -> Vec<&str> {
        self.searchable_properties_with_types
            .iter()
            .filter(|(_, kind)| kind.element() == SchemaType::String)
            .map(|(path, _)| path.as_str())
            .collect()
    }

    pub fn type_of(&self, property: &str) -> Option<SchemaType> {
        self.searchable_properties_with_types.get(property).copied()
    }

    pub fn insert(
        &mut self,
        property: &str,
        id: DocId,
        value: &FieldValue,
        tokenizer: &dyn Tokenizer,
    ) -> Result<()> {
        match value {
            FieldValue::Str(text) => {
                let tokens = tokenizer.tokenize(text, None, Some(property))?;
                self.insert_string_tokens(property, id, tokens);
            }
            FieldValue::StrArray(items) => {
                // One field, one length: elements contribute to a single
                // token stream so the average-length bookkeeping stays exact.
                let mut tokens = Vec::new();
                for item in items {
                    tokens.extend(tokenizer.tokenize(item, None, Some(property))?);
                }
                self.insert_string_tokens(property, id, tokens);
            }
            FieldValue::Num(value) => {
                if let Some(PropertyIndex::Avl(tree)) = self.indexes.get_mut(property) {
                    tree.insert(*value, id);
                }
            }
            FieldValue::NumArray(items) => {
                if let Some(PropertyIndex::Avl(tree)) = self.indexes.get_mut(property) {
                    for value in items {
                        tree.insert(*value, id);
                    }
                }
            }
            FieldValue::Bool(value) => {
                if let Some(PropertyIndex::Bool(buckets)) = self.indexes.get_mut(property) {
                    buckets.insert(id, *value);
                }
            }
            FieldValue::BoolArray(items) => {
                if let Some(PropertyIndex::Bool(buckets)) = self.indexes.get_mut(property) {
                    for value in items {
                        buckets.insert(id, *value);
                    }
                }
            }
        }
        Ok(())
    }

    pub fn remove(
        &mut self,
        property: &str,
        id: DocId,
        value: &FieldValue,
        tokenizer: &dyn Tokenizer,
    ) -> Result<()> {
        match value {
            FieldValue::Str(text) => {
                let tokens = tokenizer.tokenize(text, None, Some(property))?;
                self.remove_string_tokens(property, id, tokens);
            }
            FieldValue::StrArray(items) => {
                let mut tokens = Vec::new();
                for item in items {
                    tokens.extend(tokenizer.tokenize(item, None, Some(property))?);
                }
                self.remove_string_tokens(property, id, tokens);
            }
            FieldValue::Num(value) => {
                if let Some(PropertyIndex::Avl(tree)) = self.indexes.get_mut(property) {
                    tree.remove_document(id, *value);
                }
            }
            FieldValue::NumArray(items) => {
                if let Some(PropertyIndex::Avl(tree)) = self.indexes.get_mut(property) {
                    for value in items {
                        tree.remove_document(id, *value);
                    }
                }
            }
            FieldValue::Bool(value) => {
                if let Some(PropertyIndex::Bool(buckets)) = self.indexes.get_mut(property) {
                    buckets.remove(id, *value);
                }
            }
            FieldValue::BoolArray(items) => {
                if let Some(PropertyIndex::Bool(buckets)) = self.indexes.get_mut(property) {
                    for value in items {
                        buckets.remove(id, *value);
                    }
                }
            }
        }
        Ok(())
    }

    fn insert_string_tokens(&mut self, property: &str, id: DocId, tokens: Vec<String>) {
        let token_count = tokens.len();

        let lengths = self.field_lengths.entry(property.to_string()).or_default();
        let docs_count = lengths.len() + 1;
        let avg = self
            .avg_field_length
            .entry(property.to_string())
            .or_insert(0.0);
        *avg = (*avg * (docs_count - 1) as f64 + token_count as f64) / docs_count as f64;
        lengths.insert(id, token_count);

        let mut occurrences: HashMap<&str, u32> = HashMap::new();
        for token in &tokens {
            *occurrences.entry(token.as_str()).or_insert(0) += 1;
        }

        let doc_frequencies = self
            .frequencies
            .entry(property.to_string())
            .or_default()
            .entry(id)
            .or_default();
        let property_occurrences = self
            .token_occurrences
            .entry(property.to_string())
            .or_default();
        for (token, count) in &occurrences {
            doc_frequencies.insert(
                token.to_string(),
                f64::from(*count) / token_count as f64,
            );
            *property_occurrences.entry(token.to_string()).or_insert(0) += 1;
        }

        if let Some(PropertyIndex::Radix(tree)) = self.indexes.get_mut(property) {
            for token in &tokens {
                tree.insert(token, id);
            }
        }
        trace!(property, id = id.0, tokens = token_count, "indexed string field");
    }

    fn remove_string_tokens(&mut self, property: &str, id: DocId, tokens: Vec<String>) {
        let Some(lengths) = self.field_lengths.get_mut(property) else {
            return;
        };
        let Some(length) = lengths.remove(&id) else {
            return;
        };

        let docs_before = lengths.len() + 1;
        if let Some(avg) = self.avg_field_length.get_mut(property) {
            if docs_before == 1 {
                *avg = 0.0;
            } else {
                *avg = (*avg * docs_before as f64 - length as f64) / (docs_before - 1) as f64;
            }
        }

        if let Some(frequencies) = self.frequencies.get_mut(property) {
            frequencies.remove(&id);
        }

        let distinct: HashSet<&str> = tokens.iter().map(String::as_str).collect();
        if let Some(property_occurrences) = self.token_occurrences.get_mut(property) {
            for token in &distinct {
                if let Some(count) = property_occurrences.get_mut(*token) {
                    *count -= 1;
                    if *count == 0 {
                        property_occurrences.remove(*token);
                    }
                }
            }
        }

        if let Some(PropertyIndex::Radix(tree)) = self.indexes.get_mut(property) {
            for token in &distinct {
                tree.remove_document(token, id);
            }
        }
        trace!(property, id = id.0, "unindexed string field");
    }

    /// BM25-scored lookup of a single term on a string property.
    pub fn search(
        &self,
        property: &str,
        term: &str,
        exact: bool,
        tolerance: u32,
        relevance: BM25Params,
        total_docs: usize,
    ) -> HashMap<DocId, f32> {
        let mut scores = HashMap::new();
        let Some(PropertyIndex::Radix(tree)) = self.indexes.get(property) else {
            return scores;
        };

        let matches = tree.find(&FindParams {
            term,
            exact,
            tolerance,
        });
        if matches.is_empty() {
            return scores;
        }

        let avg_field_length = self
            .avg_field_length
            .get(property)
            .copied()
            .unwrap_or_default();
        let empty_lengths = HashMap::new();
        let lengths = self.field_lengths.get(property).unwrap_or(&empty_lengths);
        let empty_occurrences = HashMap::new();
        let occurrences = self
            .token_occurrences
            .get(property)
            .unwrap_or(&empty_occurrences);
        let empty_frequencies = HashMap::new();
        let frequencies = self.frequencies.get(property).unwrap_or(&empty_frequencies);

        for (word, ids) in matches {
            let matching_count = occurrences.get(&word).copied().unwrap_or_default();
            for id in ids {
                let tf = frequencies
                    .get(&id)
                    .and_then(|terms| terms.get(&word))
                    .copied()
                    .unwrap_or_default();
                let field_length = lengths.get(&id).copied().unwrap_or_default();
                let score = bm25(
                    tf as f32,
                    matching_count,
                    total_docs,
                    field_length as f32,
                    avg_field_length as f32,
                    relevance,
                );
                *scores.entry(id).or_insert(0.0) += score;
            }
        }
        scores
    }

    /// Resolves a where clause to the set of candidate ids (AND semantics
    /// across properties).
    pub fn search_by_where_clause(
        &self,
        clause: &WhereClause,
        tokenizer: &dyn Tokenizer,
    ) -> Result<HashSet<DocId>> {
        let mut result: Option<HashSet<DocId>> = None;

        for (property, filter) in clause {
            let structure = self.indexes.get(property).ok_or_else(|| {
                Error::new(
                    ErrorKind::UnknownFilterProperty,
                    format!("unknown filter property \"{}\"", property),
                )
            })?;

            let candidates: HashSet<DocId> = match (structure, filter) {
                (PropertyIndex::Bool(buckets), WhereFilter::Boolean(value)) => {
                    buckets.get(*value).iter().copied().collect()
                }
                (PropertyIndex::Radix(tree), WhereFilter::Str(value)) => {
                    self.string_filter_ids(tree, std::slice::from_ref(value), tokenizer, property)?
                }
                (PropertyIndex::Radix(tree), WhereFilter::StrList(values)) => {
                    self.string_filter_ids(tree, values, tokenizer, property)?
                }
                (PropertyIndex::Avl(tree), WhereFilter::Comparison(comparison)) => {
                    let ids = match comparison.operation(property)? {
                        ComparisonOp::Gt(value) => tree.greater_than(value, false),
                        ComparisonOp::Gte(value) => tree.greater_than(value, true),
                        ComparisonOp::Lt(value) => tree.less_than(value, false),
                        ComparisonOp::Lte(value) => tree.less_than(value, true),
                        ComparisonOp::Eq(value) => {
                            tree.find(value).map(<[DocId]>::to_vec).unwrap_or_default()
                        }
                        ComparisonOp::Between(min, max) => tree.range(min, max),
                    };
                    ids.into_iter().collect()
                }
                _ => {
                    return Err(Error::new(
                        ErrorKind::InvalidFilterOperation,
                        format!(
                            "filter does not match the type of property \"{}\"",
                            property
                        ),
                    ));
                }
            };

            result = Some(match result {
                None => candidates,
                Some(current) => current.intersection(&candidates).copied().collect(),
            });
            if matches!(&result, Some(ids) if ids.is_empty()) {
                break;
            }
        }

        Ok(result.unwrap_or_default())
    }

    fn string_filter_ids(
        &self,
        tree: &RadixTree,
        values: &[String],
        tokenizer: &dyn Tokenizer,
        property: &str,
    ) -> Result<HashSet<DocId>> {
        let mut ids = HashSet::new();
        for value in values {
            for term in tokenizer.tokenize(value, None, Some(property))? {
                for (_, matched) in tree.find(&FindParams {
                    term: &term,
                    exact: true,
                    tolerance: 0,
                }) {
                    ids.extend(matched);
                }
            }
        }
        Ok(ids)
    }

    // Statistics accessors, used by the façade and by invariant tests.

    pub fn avg_field_length(&self, property: &str) -> f64 {
        self.avg_field_length
            .get(property)
            .copied()
            .unwrap_or_default()
    }

    pub fn field_length(&self, property: &str, id: DocId) -> Option<usize> {
        self.field_lengths.get(property)?.get(&id).copied()
    }

    pub fn token_occurrence(&self, property: &str, term: &str) -> u32 {
        self.token_occurrences
            .get(property)
            .and_then(|terms| terms.get(term))
            .copied()
            .unwrap_or_default()
    }

    pub fn frequency(&self, property: &str, id: DocId, term: &str) -> f64 {
        self.frequencies
            .get(property)
            .and_then(|docs| docs.get(&id))
            .and_then(|terms| terms.get(term))
            .copied()
            .unwrap_or_default()
    }

    pub(crate) fn field_lengths_of(&self, property: &str) -> Option<&HashMap<DocId, usize>> {
        self.field_lengths.get(property)
    }

    pub(crate) fn frequencies_of(
        &self,
        property: &str,
    ) -> Option<&HashMap<DocId, HashMap<String, f64>>> {
        self.frequencies.get(property)
    }

    pub(crate) fn radix_of(&self, property: &str) -> Option<&RadixTree> {
        match self.indexes.get(property) {
            Some(PropertyIndex::Radix(tree)) => Some(tree),
            _ => None,
        }
    }
}
