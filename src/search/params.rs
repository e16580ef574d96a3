use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::error::{Error, ErrorKind, Result};
use crate::scoring::bm25::BM25Params;
use crate::search::facets::FacetParams;
use crate::sort::sorter::SortByParams;

/// How per-term candidate sets combine in multi-term queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Union of per-term hits.
    #[default]
    Or,
    /// Intersection of per-term hits.
    And,
}

#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    pub term: String,
    /// Restricts matching to these string properties. All of them otherwise.
    pub properties: Option<Vec<String>>,
    /// Maximum Levenshtein distance for fuzzy term matches.
    pub tolerance: u32,
    /// Match whole terms only, no prefix expansion.
    pub exact: bool,
    pub mode: SearchMode,
    /// Per-property score multipliers.
    pub boost: HashMap<String, f32>,
    pub relevance: BM25Params,
    pub limit: usize,
    pub offset: usize,
    #[serde(rename = "where")]
    pub where_: Option<WhereClause>,
    #[serde(rename = "sortBy")]
    pub sort_by: Option<SortByParams>,
    pub facets: Option<HashMap<String, FacetParams>>,
}

impl Default for SearchParams {
    fn default() -> Self {
        SearchParams {
            term: String::new(),
            properties: None,
            tolerance: 0,
            exact: false,
            mode: SearchMode::Or,
            boost: HashMap::new(),
            relevance: BM25Params::default(),
            limit: 10,
            offset: 0,
            where_: None,
            sort_by: None,
            facets: None,
        }
    }
}

impl SearchParams {
    pub fn term(term: impl Into<String>) -> Self {
        SearchParams {
            term: term.into(),
            ..SearchParams::default()
        }
    }
}

/// Filter conditions keyed by property path, combined with AND semantics.
pub type WhereClause = HashMap<String, WhereFilter>;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WhereFilter {
    /// Boolean property equals the literal.
    Boolean(bool),
    /// String property matches the tokenized value exactly.
    Str(String),
    /// String property matches any of the values.
    StrList(Vec<String>),
    /// Numeric comparison; exactly one operator must be set.
    Comparison(ComparisonFilter),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComparisonFilter {
    pub gt: Option<f64>,
    pub gte: Option<f64>,
    pub lt: Option<f64>,
    pub lte: Option<f64>,
    pub eq: Option<f64>,
    pub between: Option<[f64; 2]>,
}

/// A validated single-operator comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ComparisonOp {
    Gt(f64),
    Gte(f64),
    Lt(f64),
    Lte(f64),
    Eq(f64),
    Between(f64, f64),
}

impl ComparisonFilter {
    pub fn gt(value: f64) -> Self {
        ComparisonFilter { gt: Some(value), ..ComparisonFilter::default() }
    }

    pub fn gte(value: f64) -> Self {
        ComparisonFilter { gte: Some(value), ..ComparisonFilter::default() }
    }

    pub fn lt(value: f64) -> Self {
        ComparisonFilter { lt: Some(value), ..ComparisonFilter::default() }
    }

    pub fn lte(value: f64) -> Self {
        ComparisonFilter { lte: Some(value), ..ComparisonFilter::default() }
    }

    pub fn eq(value: f64) -> Self {
        ComparisonFilter { eq: Some(value), ..ComparisonFilter::default() }
    }

    pub fn between(min: f64, max: f64) -> Self {
        ComparisonFilter { between: Some([min, max]), ..ComparisonFilter::default() }
    }

    /// Extracts the single operator, failing with `INVALID_FILTER_OPERATION`
    /// when zero or several are set.
    pub fn operation(&self, property: &str) -> Result<ComparisonOp> {
        let mut ops = Vec::new();
        if let Some(v) = self.gt {
            ops.push(ComparisonOp::Gt(v));
        }
        if let Some(v) = self.gte {
            ops.push(ComparisonOp::Gte(v));
        }
        if let Some(v) = self.lt {
            ops.push(ComparisonOp::Lt(v));
        }
        if let Some(v) = self.lte {
            ops.push(ComparisonOp::Lte(v));
        }
        if let Some(v) = self.eq {
            ops.push(ComparisonOp::Eq(v));
        }
        if let Some([min, max]) = self.between {
            ops.push(ComparisonOp::Between(min, max));
        }

        match ops.len() {
            1 => Ok(ops[0]),
            n => Err(Error::new(
                ErrorKind::InvalidFilterOperation,
                format!(
                    "expected exactly one operator on \"{}\", got {}",
                    property, n
                ),
            )),
        }
    }
}
