use serde::{Deserialize, Serialize};

/// BM25 relevance parameters, caller-tunable per search.
///
/// `k1` saturates term frequency, `b` scales length normalization, `d`
/// shifts the numerator (BM25+ lower bound; 0 recovers plain BM25).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BM25Params {
    pub k1: f32,
    pub b: f32,
    pub d: f32,
}

impl Default for BM25Params {
    fn default() -> Self {
        BM25Params {
            k1: 1.2,
            b: 0.75,
            d: 0.5,
        }
    }
}

/// Scores one (term, document, property) triple.
///
/// `tf` is the pre-normalized term frequency (occurrences over field token
/// count), `matching_count` the number of documents carrying the term on
/// this property, `total_docs` the corpus size.
pub fn bm25(
    tf: f32,
    matching_count: u32,
    total_docs: usize,
    field_length: f32,
    avg_field_length: f32,
    params: BM25Params,
) -> f32 {
    let idf = (1.0
        + (total_docs as f32 - matching_count as f32 + 0.5) / (matching_count as f32 + 0.5))
        .ln();

    idf * (params.d + tf * (params.k1 + 1.0))
        / (tf + params.k1 * (1.0 - params.b + params.b * field_length / avg_field_length))
}
