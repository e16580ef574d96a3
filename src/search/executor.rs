use std::collections::{HashMap, HashSet};
use std::time::Instant;

use parking_lot::RwLock;
use tracing::debug;

use crate::analysis::tokenizer::Tokenizer;
use crate::core::config::FormatElapsedFn;
use crate::core::docs::DocumentStore;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::id_store::IdStore;
use crate::core::types::DocId;
use crate::index::Index;
use crate::schema::schema::{Schema, SchemaType};
use crate::search::facets::compute_facets;
use crate::search::params::{SearchMode, SearchParams};
use crate::search::results::{format_elapsed, Elapsed, Hit, SearchResults};
use crate::sort::sorter::Sorter;

/// Borrowed view of the engine handed to one search.
pub(crate) struct SearchContext<'a> {
    pub index: &'a Index,
    pub docs: &'a DocumentStore,
    pub id_store: &'a IdStore,
    pub sorter: &'a RwLock<Sorter>,
    pub tokenizer: &'a dyn Tokenizer,
    pub schema: &'a Schema,
    pub format_elapsed_time: Option<&'a FormatElapsedFn>,
}

/// Runs one query: tokenize, match and score per term/property, filter,
/// order, paginate, materialize.
pub(crate) fn execute(ctx: &SearchContext, params: &SearchParams) -> Result<SearchResults> {
    let started = Instant::now();

    let tokens = if params.term.trim().is_empty() {
        Vec::new()
    } else {
        ctx.tokenizer.tokenize(&params.term, None, None)?
    };
    let properties = resolve_properties(ctx.index, params)?;
    let total_docs = ctx.docs.count();

    // Per-term BM25 contributions, summed per document across terms.
    let mut scores: HashMap<DocId, f32> = HashMap::new();
    let mut per_term_ids: Vec<HashSet<DocId>> = Vec::new();
    for token in &tokens {
        let mut term_scores: HashMap<DocId, f32> = HashMap::new();
        for property in &properties {
            let boost = params.boost.get(*property).copied().unwrap_or(1.0);
            let property_scores = ctx.index.search(
                property,
                token,
                params.exact,
                params.tolerance,
                params.relevance,
                total_docs,
            );
            for (id, score) in property_scores {
                *term_scores.entry(id).or_insert(0.0) += score * boost;
            }
        }
        per_term_ids.push(term_scores.keys().copied().collect());
        for (id, score) in term_scores {
            *scores.entry(id).or_insert(0.0) += score;
        }
    }

    // Intersection mode keeps only documents matched by every term.
    if params.mode == SearchMode::And && per_term_ids.len() > 1 {
        let mut iter = per_term_ids.iter();
        let mut matched_all = iter.next().cloned().unwrap_or_default();
        for ids in iter {
            matched_all.retain(|id| ids.contains(id));
        }
        scores.retain(|id, _| matched_all.contains(id));
    }

    let where_clause = params.where_.as_ref().filter(|clause| !clause.is_empty());
    let mut results: Vec<(DocId, f32)> = if tokens.is_empty() {
        // No query terms: a filter-only search returns the filter result;
        // an entirely empty query returns nothing.
        match where_clause {
            Some(clause) => ctx
                .index
                .search_by_where_clause(clause, ctx.tokenizer)?
                .into_iter()
                .map(|id| (id, 0.0))
                .collect(),
            None => Vec::new(),
        }
    } else {
        let mut results: Vec<(DocId, f32)> = scores.into_iter().collect();
        if let Some(clause) = where_clause {
            let allowed = ctx.index.search_by_where_clause(clause, ctx.tokenizer)?;
            results.retain(|(id, _)| allowed.contains(id));
        }
        results
    };

    match &params.sort_by {
        Some(by) => {
            results = ctx.sorter.write().sort_by(results, by)?;
        }
        None => {
            // Descending score; ascending internal id keeps ties stable.
            results.sort_by(|a, b| {
                b.1.partial_cmp(&a.1)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.0.cmp(&b.0))
            });
        }
    }

    let count = results.len();

    let facets = match &params.facets {
        Some(config) => {
            let documents: Vec<(DocId, &serde_json::Value)> = results
                .iter()
                .filter_map(|(id, _)| ctx.docs.get(*id).map(|doc| (*id, doc)))
                .collect();
            Some(compute_facets(config, ctx.schema, &documents)?)
        }
        None => None,
    };

    let hits: Vec<Hit> = results
        .into_iter()
        .skip(params.offset)
        .take(params.limit)
        .filter_map(|(id, score)| {
            let document = ctx.docs.get(id)?.clone();
            let external = ctx.id_store.external_of(id)?.to_string();
            Some(Hit {
                id: external,
                score,
                document,
            })
        })
        .collect();

    let duration = started.elapsed();
    let formatted = match ctx.format_elapsed_time {
        Some(format) => format(duration),
        None => format_elapsed(duration),
    };
    debug!(term = %params.term, count, elapsed = %formatted, "search completed");

    Ok(SearchResults {
        elapsed: Elapsed {
            raw: duration.as_nanos(),
            formatted,
        },
        count,
        hits,
        facets,
    })
}

fn resolve_properties<'a>(index: &'a Index, params: &'a SearchParams) -> Result<Vec<&'a str>> {
    match &params.properties {
        None => Ok(index.string_properties()),
        Some(list) => {
            for property in list {
                match index.type_of(property) {
                    Some(kind) if kind.element() == SchemaType::String => {}
                    _ => {
                        return Err(Error::new(
                            ErrorKind::UnknownSearchableProperty,
                            format!("\"{}\" is not a searchable string property", property),
                        ));
                    }
                }
            }
            Ok(list.iter().map(String::as_str).collect())
        }
    }
}
