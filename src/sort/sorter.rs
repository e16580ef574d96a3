use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::analysis::language::Language;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{DocId, ScalarValue};
use crate::schema::schema::{Schema, SchemaType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    #[serde(rename = "ASC")]
    Asc,
    #[serde(rename = "DESC")]
    Desc,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortByParams {
    pub property: String,
    pub order: SortOrder,
}

/// Per-property sort state.
///
/// `ordered_docs` is only sorted when `is_sorted`; `positions` maps an id to
/// its index in `ordered_docs` and is only valid when sorted. Removals are
/// deferred into `pending_remove` so a delete never shifts the vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortState {
    #[serde(rename = "type")]
    pub kind: SchemaType,
    #[serde(rename = "docs")]
    pub positions: HashMap<DocId, usize>,
    #[serde(rename = "orderedDocs")]
    pub ordered_docs: Vec<(DocId, ScalarValue)>,
    #[serde(skip)]
    pub pending_remove: HashSet<DocId>,
    #[serde(skip, default = "default_sorted")]
    pub is_sorted: bool,
}

fn default_sorted() -> bool {
    // Snapshots are flushed before save, so restored state starts sorted.
    true
}

impl SortState {
    fn new(kind: SchemaType) -> Self {
        SortState {
            kind,
            positions: HashMap::new(),
            ordered_docs: Vec::new(),
            pending_remove: HashSet::new(),
            is_sorted: true,
        }
    }
}

/// Maintains one lazily-sorted document list per sortable property.
///
/// Sortable properties are the scalar-typed schema paths minus the
/// configured unsortable ones; array paths are never sortable.
#[derive(Debug, Default)]
pub struct Sorter {
    pub enabled: bool,
    pub language: Language,
    sortable_properties: Vec<String>,
    sortable_properties_with_types: HashMap<String, SchemaType>,
    /// Array-typed paths, kept to distinguish "wrong type" from "unknown".
    array_properties: HashSet<String>,
    sorts: HashMap<String, SortState>,
}

impl Sorter {
    pub fn new(
        schema: &Schema,
        enabled: bool,
        unsortable_properties: &[String],
        language: Language,
    ) -> Self {
        let mut sorter = Sorter {
            enabled,
            language,
            ..Sorter::default()
        };
        if !enabled {
            return sorter;
        }

        for (path, kind) in schema.properties() {
            if kind.is_array() {
                sorter.array_properties.insert(path.clone());
                continue;
            }
            if unsortable_properties.contains(path) {
                continue;
            }
            sorter.sortable_properties.push(path.clone());
            sorter
                .sortable_properties_with_types
                .insert(path.clone(), *kind);
            sorter.sorts.insert(path.clone(), SortState::new(*kind));
        }
        sorter
    }

    pub fn sortable_properties(&self) -> &[String] {
        &self.sortable_properties
    }

    /// Appends without sorting; ordering is repaired lazily on first use.
    /// A disabled sorter ignores inserts.
    pub fn insert(&mut self, property: &str, id: DocId, value: ScalarValue, language: Language) {
        if !self.enabled {
            return;
        }
        self.language = language;
        let Some(state) = self.sorts.get_mut(property) else {
            return;
        };
        state.ordered_docs.push((id, value));
        state.positions.insert(id, state.ordered_docs.len() - 1);
        state.is_sorted = false;
    }

    /// Marks `id` for deferred removal. Position 0 is a valid position, so
    /// presence is checked on the map itself, never on the looked-up value.
    pub fn remove(&mut self, property: &str, id: DocId) {
        if !self.enabled {
            return;
        }
        let Some(state) = self.sorts.get_mut(property) else {
            return;
        };
        if state.positions.remove(&id).is_some() {
            state.pending_remove.insert(id);
            state.is_sorted = false;
        }
    }

    /// Applies pending removals, sorts by the property's type, and rebuilds
    /// the position map.
    pub fn ensure_sorted(&mut self, property: &str) {
        let language = self.language;
        let Some(state) = self.sorts.get_mut(property) else {
            return;
        };
        if state.is_sorted {
            return;
        }

        if !state.pending_remove.is_empty() {
            let pending = std::mem::take(&mut state.pending_remove);
            state
                .ordered_docs
                .retain(|(id, _)| !pending.contains(id));
        }

        state
            .ordered_docs
            .sort_by(|a, b| compare_values(&a.1, &b.1, language));

        state.positions.clear();
        for (position, (id, _)) in state.ordered_docs.iter().enumerate() {
            state.positions.insert(*id, position);
        }
        state.is_sorted = true;
    }

    /// Reorders scored candidates by the property's sorted positions.
    ///
    /// Candidates without an entry for the property keep their relative
    /// order after every positioned candidate.
    pub fn sort_by(
        &mut self,
        docs: Vec<(DocId, f32)>,
        by: &SortByParams,
    ) -> Result<Vec<(DocId, f32)>> {
        if !self.enabled {
            return Err(Error::new(
                ErrorKind::SortDisabled,
                "sorting was disabled at database creation",
            ));
        }
        if self.array_properties.contains(&by.property) {
            return Err(Error::new(
                ErrorKind::InvalidSortSchemaType,
                format!("cannot sort on array property \"{}\"", by.property),
            ));
        }
        if !self.sorts.contains_key(&by.property) {
            return Err(Error::new(
                ErrorKind::UnableToSortOnUnknownField,
                format!("\"{}\" is not a sortable property", by.property),
            ));
        }

        self.ensure_sorted(&by.property);
        let state = &self.sorts[&by.property];

        let mut positioned: Vec<(usize, (DocId, f32))> = Vec::new();
        let mut rest: Vec<(DocId, f32)> = Vec::new();
        for doc in docs {
            match state.positions.get(&doc.0) {
                Some(position) => positioned.push((*position, doc)),
                None => rest.push(doc),
            }
        }

        positioned.sort_by_key(|(position, _)| *position);
        if by.order == SortOrder::Desc {
            positioned.reverse();
        }

        let mut out: Vec<(DocId, f32)> = positioned.into_iter().map(|(_, doc)| doc).collect();
        out.extend(rest);
        Ok(out)
    }

    /// Applies every pending removal and materializes every sort.
    pub fn flush(&mut self) {
        let properties: Vec<String> = self.sorts.keys().cloned().collect();
        for property in properties {
            self.ensure_sorted(&property);
        }
    }

    pub fn is_fully_sorted(&self) -> bool {
        self.sorts.values().all(|state| state.is_sorted)
    }

    pub(crate) fn states(&self) -> &HashMap<String, SortState> {
        &self.sorts
    }

    pub(crate) fn types(&self) -> &HashMap<String, SchemaType> {
        &self.sortable_properties_with_types
    }

    pub(crate) fn restore(
        &mut self,
        sorts: HashMap<String, SortState>,
        language: Language,
    ) {
        self.language = language;
        for (property, state) in sorts {
            self.sorts.insert(property, state);
        }
    }
}

fn compare_values(a: &ScalarValue, b: &ScalarValue, language: Language) -> Ordering {
    match (a, b) {
        (ScalarValue::Num(a), ScalarValue::Num(b)) => a.total_cmp(b),
        (ScalarValue::Str(a), ScalarValue::Str(b)) => {
            crate::analysis::normalize::normalize(a, language)
                .cmp(&crate::analysis::normalize::normalize(b, language))
        }
        // Ascending order puts true first.
        (ScalarValue::Bool(a), ScalarValue::Bool(b)) => b.cmp(a),
        _ => Ordering::Equal,
    }
}
