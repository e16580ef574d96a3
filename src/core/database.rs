use parking_lot::RwLock;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::analysis::language::Language;
use crate::analysis::tokenizer::{DefaultTokenizer, Tokenizer, TokenizerConfig};
use crate::core::config::{
    Components, DatabaseConfig, FormatElapsedFn, GetDocumentIdFn, Hooks, SortConfig,
    TokenizerComponent,
};
use crate::core::docs::DocumentStore;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::id_store::IdStore;
use crate::core::snapshot::{DocsSnapshot, PersistedState, SorterSnapshot};
use crate::index::Index;
use crate::schema::schema::Schema;
use crate::search::executor::{execute, SearchContext};
use crate::search::params::SearchParams;
use crate::search::results::SearchResults;
use crate::sort::sorter::Sorter;

/// An embeddable in-memory full-text search database.
///
/// Writes take `&mut self`, so there is exactly one writer at a time;
/// searches take `&self` and are safe to run concurrently against a stable
/// index. The sorter sits behind a lock because ordering is repaired lazily
/// during reads.
pub struct Database {
    id: String,
    schema: Schema,
    language: Language,
    sort_config: SortConfig,
    tokenizer: Box<dyn Tokenizer>,
    index: Index,
    docs: DocumentStore,
    sorter: RwLock<Sorter>,
    id_store: IdStore,
    hooks: Hooks,
    get_document_id: Option<GetDocumentIdFn>,
    format_elapsed_time: Option<FormatElapsedFn>,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("id", &self.id)
            .field("schema", &self.schema)
            .field("language", &self.language)
            .field("sort_config", &self.sort_config)
            .field("index", &self.index)
            .field("docs", &self.docs)
            .field("id_store", &self.id_store)
            .finish_non_exhaustive()
    }
}

impl Database {
    pub fn new(config: DatabaseConfig) -> Result<Self> {
        let schema = Schema::parse(&config.schema)?;

        let Components {
            tokenizer,
            get_document_id,
            format_elapsed_time,
            hooks,
        } = config.components;

        let tokenizer: Box<dyn Tokenizer> = match tokenizer {
            Some(TokenizerComponent::Instance(instance)) => {
                if config.language.is_some() {
                    return Err(Error::new(
                        ErrorKind::NoLanguageWithCustomTokenizer,
                        "do not pass a language when a custom tokenizer instance is given",
                    ));
                }
                instance
            }
            Some(TokenizerComponent::Config(tokenizer_config)) => {
                let language = match &config.language {
                    Some(code) => Language::from_code(code)?,
                    None => tokenizer_config.language,
                };
                Box::new(DefaultTokenizer::new(TokenizerConfig {
                    language,
                    ..tokenizer_config
                }))
            }
            None => {
                let language = config
                    .language
                    .as_deref()
                    .map(Language::from_code)
                    .transpose()?
                    .unwrap_or_default();
                Box::new(DefaultTokenizer::new(TokenizerConfig {
                    language,
                    ..TokenizerConfig::default()
                }))
            }
        };

        let language = tokenizer.language();
        let index = Index::from_schema(&schema);
        let sorter = Sorter::new(
            &schema,
            config.sort.enabled,
            &config.sort.unsortable_properties,
            language,
        );

        Ok(Database {
            id: config.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            schema,
            language,
            sort_config: config.sort,
            tokenizer,
            index,
            docs: DocumentStore::new(),
            sorter: RwLock::new(sorter),
            id_store: IdStore::new(),
            hooks,
            get_document_id,
            format_elapsed_time,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Number of stored documents.
    pub fn count(&self) -> usize {
        self.docs.count()
    }

    /// Inserts a document and returns its external id.
    ///
    /// The id comes from the configured resolver, the document's string `id`
    /// field, or a generated UUID, in that order. Re-inserting an existing
    /// id replaces the previous document.
    pub fn insert(&mut self, document: Value) -> Result<String> {
        for hook in &self.hooks.before_insert {
            hook(&document)?;
        }

        let external_id = self.insert_unhooked(document.clone())?;

        for hook in &self.hooks.after_insert {
            hook(&external_id, &document)?;
        }
        Ok(external_id)
    }

    pub fn insert_multiple(&mut self, documents: Vec<Value>) -> Result<Vec<String>> {
        for hook in &self.hooks.before_insert_multiple {
            hook(&documents)?;
        }

        let mut ids = Vec::with_capacity(documents.len());
        for document in &documents {
            ids.push(self.insert(document.clone())?);
        }

        for hook in &self.hooks.after_insert_multiple {
            hook(&ids, &documents)?;
        }
        Ok(ids)
    }

    /// Removes a document by external id. Unknown ids are a no-op.
    pub fn remove(&mut self, external_id: &str) -> Result<bool> {
        if self.id_store.get(external_id).is_none() {
            return Ok(false);
        }
        for hook in &self.hooks.before_remove {
            hook(external_id)?;
        }

        let removed = self.remove_unhooked(external_id)?;

        for hook in &self.hooks.after_remove {
            hook(external_id)?;
        }
        Ok(removed)
    }

    pub fn remove_multiple(&mut self, external_ids: &[String]) -> Result<usize> {
        for hook in &self.hooks.before_remove_multiple {
            hook(external_ids)?;
        }

        let mut removed = 0;
        for external_id in external_ids {
            if self.remove(external_id)? {
                removed += 1;
            }
        }

        for hook in &self.hooks.after_remove_multiple {
            hook(external_ids)?;
        }
        Ok(removed)
    }

    /// Replaces the document stored under `external_id` with `document`,
    /// returning the new document's id.
    pub fn update(&mut self, external_id: &str, document: Value) -> Result<String> {
        for hook in &self.hooks.before_update {
            hook(external_id)?;
        }

        self.remove_unhooked(external_id)?;
        let new_id = self.insert_unhooked(document.clone())?;

        for hook in &self.hooks.after_update {
            hook(&new_id, &document)?;
        }
        Ok(new_id)
    }

    pub fn update_multiple(
        &mut self,
        external_ids: &[String],
        documents: Vec<Value>,
    ) -> Result<Vec<String>> {
        for hook in &self.hooks.before_update_multiple {
            hook(external_ids)?;
        }

        let mut ids = Vec::with_capacity(documents.len());
        for (external_id, document) in external_ids.iter().zip(documents.iter()) {
            ids.push(self.update(external_id, document.clone())?);
        }

        for hook in &self.hooks.after_update_multiple {
            hook(&ids, &documents)?;
        }
        Ok(ids)
    }

    pub fn search(&self, params: &SearchParams) -> Result<SearchResults> {
        let ctx = SearchContext {
            index: &self.index,
            docs: &self.docs,
            id_store: &self.id_store,
            sorter: &self.sorter,
            tokenizer: self.tokenizer.as_ref(),
            schema: &self.schema,
            format_elapsed_time: self.format_elapsed_time.as_ref(),
        };
        execute(&ctx, params)
    }

    /// Captures the whole database state. The sorter is flushed first so
    /// the snapshot holds materialized orderings.
    pub fn save(&self) -> Result<PersistedState> {
        self.sorter.write().flush();
        let sorter = self.sorter.read();

        Ok(PersistedState {
            internal_document_id_store: self.id_store.clone(),
            index: self.index.clone(),
            sorter: SorterSnapshot {
                sortable_properties: sorter.sortable_properties().to_vec(),
                sortable_properties_with_types: sorter.types().clone(),
                sorts: sorter.states().clone(),
                enabled: sorter.enabled,
                is_sorted: sorter.is_fully_sorted(),
                language: sorter.language,
            },
            docs: DocsSnapshot {
                count: self.docs.count(),
                docs: self.docs.as_map().clone(),
            },
        })
    }

    /// Replaces this database's state with a previously saved snapshot.
    /// The receiving database must have been created with the same schema
    /// and tokenizer configuration.
    pub fn load(&mut self, state: PersistedState) -> Result<()> {
        let mut id_store = state.internal_document_id_store;
        id_store.rebuild();
        self.id_store = id_store;
        self.index = state.index;
        self.docs = DocumentStore::from_map(state.docs.docs);

        let mut sorter = Sorter::new(
            &self.schema,
            state.sorter.enabled,
            &self.sort_config.unsortable_properties,
            state.sorter.language,
        );
        sorter.restore(state.sorter.sorts, state.sorter.language);
        *self.sorter.write() = sorter;
        Ok(())
    }

    pub(crate) fn index(&self) -> &Index {
        &self.index
    }

    fn insert_unhooked(&mut self, document: Value) -> Result<String> {
        self.schema.validate_document(&document)?;
        let external_id = self.resolve_document_id(&document);

        // Same external id again means replace.
        if self.id_store.get(&external_id).is_some() {
            self.remove_unhooked(&external_id)?;
        }

        let id = self.id_store.intern(&external_id);
        for (path, value) in self.schema.extract(&document) {
            self.index.insert(path, id, &value, self.tokenizer.as_ref())?;
            if let Some(scalar) = value.as_scalar() {
                self.sorter.write().insert(path, id, scalar, self.language);
            }
        }
        self.docs.insert(id, document);
        debug!(id = %external_id, internal = id.0, "document indexed");
        Ok(external_id)
    }

    fn remove_unhooked(&mut self, external_id: &str) -> Result<bool> {
        let Some(id) = self.id_store.get(external_id) else {
            return Ok(false);
        };
        let Some(document) = self.docs.remove(id) else {
            return Ok(false);
        };

        for (path, value) in self.schema.extract(&document) {
            self.index.remove(path, id, &value, self.tokenizer.as_ref())?;
            if value.as_scalar().is_some() {
                self.sorter.write().remove(path, id);
            }
        }
        debug!(id = %external_id, internal = id.0, "document removed");
        Ok(true)
    }

    fn resolve_document_id(&self, document: &Value) -> String {
        if let Some(resolver) = &self.get_document_id {
            if let Some(id) = resolver(document) {
                return id;
            }
        }
        match document.get("id").and_then(Value::as_str) {
            Some(id) => id.to_string(),
            None => Uuid::new_v4().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::tokenizer::StopWordsConfig;
    use crate::core::types::DocId;
    use crate::search::params::{ComparisonFilter, SearchMode, WhereClause, WhereFilter};
    use crate::sort::sorter::{SortByParams, SortOrder};
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn database(schema: Value) -> Database {
        Database::new(DatabaseConfig::new(schema)).unwrap()
    }

    /// Database with a plain tokenizer: no stemming, no stop words.
    fn plain_database(schema: Value) -> Database {
        let mut config = DatabaseConfig::new(schema);
        config.components.tokenizer = Some(TokenizerComponent::Config(TokenizerConfig {
            stemming: false,
            stop_words: StopWordsConfig::Disabled,
            ..TokenizerConfig::default()
        }));
        Database::new(config).unwrap()
    }

    fn hit_ids(results: &SearchResults) -> Vec<&str> {
        results.hits.iter().map(|hit| hit.id.as_str()).collect()
    }

    #[test]
    fn test_shorter_document_ranks_first() {
        let mut db = plain_database(json!({"text": "string"}));
        db.insert(json!({"id": "long", "text": "hello world"})).unwrap();
        db.insert(json!({"id": "short", "text": "hello"})).unwrap();

        let results = db.search(&SearchParams::term("hello")).unwrap();
        assert_eq!(results.count, 2);
        assert_eq!(hit_ids(&results), vec!["short", "long"]);
        assert!(results.hits[0].score > results.hits[1].score);
    }

    #[test]
    fn test_prefix_and_tolerance_ordering() {
        let mut db = plain_database(json!({"text": "string"}));
        for (id, text) in [
            ("1", "plane"),
            ("2", "planetary"),
            ("3", "plastic"),
            ("4", "grain"),
        ] {
            db.insert(json!({"id": id, "text": text})).unwrap();
        }

        let results = db
            .search(&SearchParams {
                tolerance: 1,
                ..SearchParams::term("plane")
            })
            .unwrap();
        // The exact term ranks first; the prefix expansion follows. The
        // remaining terms sit beyond the edit tolerance.
        assert_eq!(hit_ids(&results), vec!["1", "2"]);
    }

    #[test]
    fn test_numeric_range_filter() {
        let mut db = database(json!({"price": "number"}));
        for (id, price) in [("a", 10), ("b", 20), ("c", 30), ("d", 40), ("e", 50)] {
            db.insert(json!({"id": id, "price": price})).unwrap();
        }

        let mut clause = WhereClause::new();
        clause.insert(
            "price".to_string(),
            WhereFilter::Comparison(ComparisonFilter::between(20.0, 40.0)),
        );
        let results = db
            .search(&SearchParams {
                where_: Some(clause),
                ..SearchParams::default()
            })
            .unwrap();
        assert_eq!(results.count, 3);
        let mut ids = hit_ids(&results);
        ids.sort_unstable();
        assert_eq!(ids, vec!["b", "c", "d"]);
    }

    #[test]
    fn test_inverted_range_matches_nothing() {
        let mut db = database(json!({"price": "number"}));
        db.insert(json!({"id": "a", "price": 30})).unwrap();

        let mut clause = WhereClause::new();
        clause.insert(
            "price".to_string(),
            WhereFilter::Comparison(ComparisonFilter::between(40.0, 20.0)),
        );
        let results = db
            .search(&SearchParams {
                where_: Some(clause),
                ..SearchParams::default()
            })
            .unwrap();
        assert_eq!(results.count, 0);
    }

    #[test]
    fn test_boolean_filter_with_ascending_sort() {
        let mut db = database(json!({"in_stock": "boolean", "price": "number"}));
        for (id, in_stock, price) in [
            ("a", true, 40),
            ("b", false, 10),
            ("c", true, 20),
            ("d", true, 30),
        ] {
            db.insert(json!({"id": id, "in_stock": in_stock, "price": price}))
                .unwrap();
        }

        let mut clause = WhereClause::new();
        clause.insert("in_stock".to_string(), WhereFilter::Boolean(true));
        let results = db
            .search(&SearchParams {
                where_: Some(clause),
                sort_by: Some(SortByParams {
                    property: "price".to_string(),
                    order: SortOrder::Asc,
                }),
                ..SearchParams::default()
            })
            .unwrap();
        assert_eq!(hit_ids(&results), vec!["c", "d", "a"]);
    }

    #[test]
    fn test_removal_restores_statistics() {
        let mut db = plain_database(json!({"text": "string"}));
        db.insert(json!({"id": "1", "text": "quick brown fox"})).unwrap();
        db.insert(json!({"id": "2", "text": "lazy dog"})).unwrap();
        db.insert(json!({"id": "3", "text": "quick dog runs"})).unwrap();

        let avg_before = db.index().avg_field_length("text");
        let terms_before = db.index().radix_of("text").unwrap().term_count();
        let quick_before = db.index().token_occurrence("text", "quick");
        let dog_before = db.index().token_occurrence("text", "dog");

        db.remove("2").unwrap();
        db.remove("3").unwrap();
        db.insert(json!({"id": "2", "text": "lazy dog"})).unwrap();
        db.insert(json!({"id": "3", "text": "quick dog runs"})).unwrap();

        assert!((db.index().avg_field_length("text") - avg_before).abs() < 1e-9);
        assert_eq!(db.index().radix_of("text").unwrap().term_count(), terms_before);
        assert_eq!(db.index().token_occurrence("text", "quick"), quick_before);
        assert_eq!(db.index().token_occurrence("text", "dog"), dog_before);
    }

    #[test]
    fn test_insert_then_remove_returns_to_pre_insert_state() {
        let mut db = plain_database(json!({"text": "string", "price": "number"}));
        db.insert(json!({"id": "keep", "text": "alpha beta", "price": 1}))
            .unwrap();

        let avg_before = db.index().avg_field_length("text");
        let terms_before = db.index().radix_of("text").unwrap().term_count();

        db.insert(json!({"id": "gone", "text": "alpha gamma delta", "price": 2}))
            .unwrap();
        db.remove("gone").unwrap();

        assert!((db.index().avg_field_length("text") - avg_before).abs() < 1e-9);
        assert_eq!(db.index().radix_of("text").unwrap().term_count(), terms_before);
        assert_eq!(db.index().token_occurrence("text", "gamma"), 0);
        assert_eq!(db.index().field_length("text", DocId(2)), None);
        assert_eq!(db.count(), 1);
    }

    #[test]
    fn test_stop_words_do_not_affect_scores() {
        let mut db = database(json!({"text": "string"}));
        db.insert(json!({"id": "a", "text": "a quick brown fox"})).unwrap();
        db.insert(json!({"id": "b", "text": "the quick brown fox"})).unwrap();

        let results = db.search(&SearchParams::term("the quick brown fox")).unwrap();
        assert_eq!(results.count, 2);
        let diff = (results.hits[0].score - results.hits[1].score).abs();
        assert!(diff < 1e-6, "scores differ by {}", diff);
    }

    #[test]
    fn test_empty_query_returns_no_hits() {
        let mut db = database(json!({"text": "string"}));
        db.insert(json!({"id": "a", "text": "something"})).unwrap();

        let results = db.search(&SearchParams::default()).unwrap();
        assert_eq!(results.count, 0);
        assert!(results.hits.is_empty());
        assert!(!results.elapsed.formatted.is_empty());
    }

    #[test]
    fn test_tolerance_zero_matches_exact_on_existing_terms() {
        let mut db = plain_database(json!({"text": "string"}));
        db.insert(json!({"id": "a", "text": "hello world"})).unwrap();
        db.insert(json!({"id": "b", "text": "help"})).unwrap();

        let exact = db
            .search(&SearchParams {
                exact: true,
                ..SearchParams::term("world")
            })
            .unwrap();
        let tolerant = db
            .search(&SearchParams {
                tolerance: 0,
                ..SearchParams::term("world")
            })
            .unwrap();
        assert_eq!(hit_ids(&exact), hit_ids(&tolerant));
        assert_eq!(exact.count, 1);
    }

    #[test]
    fn test_multi_term_mode_union_and_intersection() {
        let mut db = plain_database(json!({"text": "string"}));
        db.insert(json!({"id": "1", "text": "hello world"})).unwrap();
        db.insert(json!({"id": "2", "text": "hello"})).unwrap();
        db.insert(json!({"id": "3", "text": "world peace hello"})).unwrap();
        db.insert(json!({"id": "4", "text": "peace"})).unwrap();

        let union = db.search(&SearchParams::term("hello world")).unwrap();
        assert_eq!(union.count, 3);

        let intersection = db
            .search(&SearchParams {
                mode: SearchMode::And,
                ..SearchParams::term("hello world")
            })
            .unwrap();
        let mut ids = hit_ids(&intersection);
        ids.sort_unstable();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_property_restriction_and_boost() {
        let mut db = plain_database(json!({"title": "string", "body": "string"}));
        db.insert(json!({"id": "t", "title": "rust", "body": "language"}))
            .unwrap();
        db.insert(json!({"id": "b", "title": "guide", "body": "rust"}))
            .unwrap();

        let restricted = db
            .search(&SearchParams {
                properties: Some(vec!["title".to_string()]),
                ..SearchParams::term("rust")
            })
            .unwrap();
        assert_eq!(hit_ids(&restricted), vec!["t"]);

        let boosted = db
            .search(&SearchParams {
                boost: HashMap::from([("title".to_string(), 3.0)]),
                ..SearchParams::term("rust")
            })
            .unwrap();
        assert_eq!(hit_ids(&boosted), vec!["t", "b"]);
        assert!(boosted.hits[0].score > boosted.hits[1].score);
    }

    #[test]
    fn test_unknown_search_property_is_rejected() {
        let db = database(json!({"title": "string", "price": "number"}));

        for property in ["missing", "price"] {
            let err = db
                .search(&SearchParams {
                    properties: Some(vec![property.to_string()]),
                    ..SearchParams::term("x")
                })
                .unwrap_err();
            assert_eq!(err.kind, ErrorKind::UnknownSearchableProperty);
        }
    }

    #[test]
    fn test_pagination_slices_after_counting() {
        let mut db = plain_database(json!({"text": "string"}));
        for i in 0..25 {
            db.insert(json!({"id": i.to_string(), "text": "common term"}))
                .unwrap();
        }

        let page = db
            .search(&SearchParams {
                limit: 10,
                offset: 20,
                ..SearchParams::term("common")
            })
            .unwrap();
        assert_eq!(page.count, 25);
        assert_eq!(page.hits.len(), 5);
    }

    #[test]
    fn test_sort_disabled_rejects_sort_by() {
        let mut config = DatabaseConfig::new(json!({"price": "number"}));
        config.sort.enabled = false;
        let mut db = Database::new(config).unwrap();
        db.insert(json!({"id": "a", "price": 1})).unwrap();

        let err = db
            .search(&SearchParams {
                where_: Some(HashMap::from([(
                    "price".to_string(),
                    WhereFilter::Comparison(ComparisonFilter::gt(0.0)),
                )])),
                sort_by: Some(SortByParams {
                    property: "price".to_string(),
                    order: SortOrder::Asc,
                }),
                ..SearchParams::default()
            })
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::SortDisabled);
    }

    #[test]
    fn test_save_load_round_trip_answers_identically() {
        let mut db = database(json!({"text": "string", "price": "number", "in_stock": "boolean"}));
        for (id, text, price, in_stock) in [
            ("1", "the quick brown fox", 10, true),
            ("2", "lazy dogs sleep all day", 25, false),
            ("3", "quick thinking wins", 40, true),
        ] {
            db.insert(json!({"id": id, "text": text, "price": price, "in_stock": in_stock}))
                .unwrap();
        }

        let term_query = SearchParams::term("quick");
        let filter_query = SearchParams {
            where_: Some(HashMap::from([(
                "price".to_string(),
                WhereFilter::Comparison(ComparisonFilter::gte(20.0)),
            )])),
            sort_by: Some(SortByParams {
                property: "price".to_string(),
                order: SortOrder::Desc,
            }),
            ..SearchParams::default()
        };

        let before_term = db.search(&term_query).unwrap();
        let before_filter = db.search(&filter_query).unwrap();

        // Through JSON and back, as a host application would persist it.
        let encoded = serde_json::to_string(&db.save().unwrap()).unwrap();
        let state: PersistedState = serde_json::from_str(&encoded).unwrap();

        let mut restored =
            database(json!({"text": "string", "price": "number", "in_stock": "boolean"}));
        restored.load(state).unwrap();

        let after_term = restored.search(&term_query).unwrap();
        assert_eq!(hit_ids(&before_term), hit_ids(&after_term));
        for (before, after) in before_term.hits.iter().zip(after_term.hits.iter()) {
            assert!((before.score - after.score).abs() < 1e-6);
        }

        let after_filter = restored.search(&filter_query).unwrap();
        assert_eq!(hit_ids(&before_filter), hit_ids(&after_filter));

        // The restored database accepts further writes.
        restored
            .insert(json!({"id": "4", "text": "quick update", "price": 5, "in_stock": true}))
            .unwrap();
        assert_eq!(restored.search(&term_query).unwrap().count, 3);
    }

    #[test]
    fn test_update_replaces_document() {
        let mut db = plain_database(json!({"text": "string"}));
        db.insert(json!({"id": "doc", "text": "old content"})).unwrap();

        db.update("doc", json!({"id": "doc", "text": "new content"}))
            .unwrap();

        assert_eq!(db.count(), 1);
        assert_eq!(db.search(&SearchParams::term("old")).unwrap().count, 0);
        assert_eq!(db.search(&SearchParams::term("new")).unwrap().count, 1);
    }

    #[test]
    fn test_reinserting_same_id_replaces_previous_version() {
        let mut db = plain_database(json!({"text": "string"}));
        db.insert(json!({"id": "doc", "text": "first"})).unwrap();
        db.insert(json!({"id": "doc", "text": "second"})).unwrap();

        assert_eq!(db.count(), 1);
        assert_eq!(db.search(&SearchParams::term("first")).unwrap().count, 0);
        assert_eq!(db.search(&SearchParams::term("second")).unwrap().count, 1);
    }

    #[test]
    fn test_remove_unknown_id_is_a_silent_no_op() {
        let mut db = database(json!({"text": "string"}));
        assert!(!db.remove("ghost").unwrap());
    }

    #[test]
    fn test_generated_ids_for_documents_without_id_field() {
        let mut db = database(json!({"text": "string"}));
        let id = db.insert(json!({"text": "anonymous"})).unwrap();
        assert_eq!(id.len(), 36);
        assert_eq!(db.count(), 1);
    }

    #[test]
    fn test_custom_id_resolver_component() {
        let mut config = DatabaseConfig::new(json!({"text": "string", "slug": "string"}));
        config.components.get_document_id = Some(Box::new(|doc| {
            doc.get("slug").and_then(Value::as_str).map(str::to_string)
        }));
        let mut db = Database::new(config).unwrap();

        let id = db
            .insert(json!({"slug": "my-post", "text": "content"}))
            .unwrap();
        assert_eq!(id, "my-post");
    }

    #[test]
    fn test_schema_validation_rejects_mistyped_documents() {
        let mut db = database(json!({"price": "number"}));
        let err = db.insert(json!({"id": "a", "price": "expensive"})).unwrap_err();
        assert_eq!(err.kind, ErrorKind::SchemaValidationFailure);
        assert_eq!(db.count(), 0);
    }

    #[test]
    fn test_hooks_run_and_can_abort() {
        let inserted = Arc::new(AtomicUsize::new(0));
        let removed = Arc::new(AtomicUsize::new(0));

        let mut config = DatabaseConfig::new(json!({"text": "string"}));
        let inserted_count = inserted.clone();
        config
            .components
            .hooks
            .after_insert
            .push(Box::new(move |_, _| {
                inserted_count.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }));
        let removed_count = removed.clone();
        config
            .components
            .hooks
            .after_remove
            .push(Box::new(move |_| {
                removed_count.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }));
        config
            .components
            .hooks
            .before_insert
            .push(Box::new(|doc| {
                if doc.get("text").and_then(Value::as_str) == Some("forbidden") {
                    Err(Error::new(ErrorKind::SchemaValidationFailure, "rejected"))
                } else {
                    Ok(())
                }
            }));

        let mut db = Database::new(config).unwrap();
        db.insert(json!({"id": "a", "text": "fine"})).unwrap();
        assert!(db.insert(json!({"id": "b", "text": "forbidden"})).is_err());
        db.remove("a").unwrap();

        assert_eq!(inserted.load(Ordering::SeqCst), 1);
        assert_eq!(removed.load(Ordering::SeqCst), 1);
        assert_eq!(db.count(), 0);
    }

    #[test]
    fn test_insert_and_remove_multiple() {
        let mut db = plain_database(json!({"text": "string"}));
        let ids = db
            .insert_multiple(vec![
                json!({"id": "1", "text": "one"}),
                json!({"id": "2", "text": "two"}),
                json!({"id": "3", "text": "three"}),
            ])
            .unwrap();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(db.count(), 3);

        let removed = db
            .remove_multiple(&["1".to_string(), "ghost".to_string(), "3".to_string()])
            .unwrap();
        assert_eq!(removed, 2);
        assert_eq!(db.count(), 1);
    }

    #[test]
    fn test_facets_over_search_results() {
        let mut db = plain_database(json!({"text": "string", "genre": "string"}));
        for (id, genre) in [("1", "rock"), ("2", "jazz"), ("3", "rock")] {
            db.insert(json!({"id": id, "text": "music", "genre": genre}))
                .unwrap();
        }

        let results = db
            .search(&SearchParams {
                facets: Some(HashMap::from([(
                    "genre".to_string(),
                    crate::search::facets::FacetParams::default(),
                )])),
                ..SearchParams::term("music")
            })
            .unwrap();
        let facets = results.facets.unwrap();
        assert_eq!(facets["genre"].values["rock"], 2);
        assert_eq!(facets["genre"].values["jazz"], 1);
    }

    #[test]
    fn test_unsupported_language_fails_at_creation() {
        let mut config = DatabaseConfig::new(json!({"text": "string"}));
        config.language = Some("klingon".to_string());
        let err = Database::new(config).unwrap_err();
        assert_eq!(err.kind, ErrorKind::LanguageNotSupported);
    }

    #[test]
    fn test_custom_tokenizer_instance_excludes_language_argument() {
        let mut config = DatabaseConfig::new(json!({"text": "string"}));
        config.components.tokenizer = Some(TokenizerComponent::Instance(Box::new(
            DefaultTokenizer::new(TokenizerConfig::default()),
        )));
        config.language = Some("english".to_string());
        let err = Database::new(config).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NoLanguageWithCustomTokenizer);
    }

    #[test]
    fn test_language_argument_configures_default_tokenizer() {
        let mut config = DatabaseConfig::new(json!({"text": "string"}));
        config.language = Some("italian".to_string());
        let db = Database::new(config).unwrap();
        assert_eq!(db.language(), Language::Italian);
    }
}
