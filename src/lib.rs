pub mod analysis;
pub mod core;
pub mod index;
pub mod schema;
pub mod scoring;
pub mod search;
pub mod sort;

pub use crate::core::config::{Components, DatabaseConfig, SortConfig, TokenizerComponent};
pub use crate::core::database::Database;
pub use crate::core::error::{Error, ErrorKind, Result};
pub use crate::search::params::SearchParams;
pub use crate::search::results::SearchResults;

/*
┌──────────────────────────────────────────────────────────────────────────────┐
│                           QUARRY STRUCT ARCHITECTURE                          │
└──────────────────────────────────────────────────────────────────────────────┘

┌────────────────────────────────────── CORE ──────────────────────────────────┐
│                                                                               │
│  ┌─────────────────────────────────────────────────────────────────────┐    │
│  │                          struct Database                             │    │
│  │  ┌───────────────────────────────────────────────────────────────┐ │    │
│  │  │ schema: Schema                  // flattened typed paths      │ │    │
│  │  │ tokenizer: Box<dyn Tokenizer>   // analysis pipeline          │ │    │
│  │  │ index: Index                    // per-property structures    │ │    │
│  │  │ docs: DocumentStore             // id → document bag          │ │    │
│  │  │ sorter: RwLock<Sorter>          // lazy per-property orders   │ │    │
│  │  │ id_store: IdStore               // external id interning      │ │    │
│  │  │ hooks: Hooks                    // write lifecycle callbacks  │ │    │
│  │  └───────────────────────────────────────────────────────────────┘ │    │
│  └─────────────────────────────────────────────────────────────────────┘    │
│                                                                               │
│  ┌──────────────────┐  ┌───────────────────┐  ┌──────────────────────────┐  │
│  │ struct DocId     │  │ enum FieldValue   │  │ struct PersistedState    │  │
│  │ • 0: u64         │  │ • Str/Num/Bool    │  │ • id store, index,       │  │
│  │  (dense, ≥ 1)    │  │ • …Array forms    │  │   sorter, docs snapshot  │  │
│  └──────────────────┘  └───────────────────┘  └──────────────────────────┘  │
└───────────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────────────── INDEXING ─────────────────────────────────┐
│                                                                               │
│  ┌─────────────────────────────────────────────────────────────────────┐    │
│  │                            struct Index                              │    │
│  │  ┌───────────────────────────────────────────────────────────────┐ │    │
│  │  │ indexes: Map<path, PropertyIndex>   // radix / avl / bool     │ │    │
│  │  │ avg_field_length, field_lengths     // BM25 length stats      │ │    │
│  │  │ token_occurrences                   // document frequencies   │ │    │
│  │  │ frequencies                         // normalized tf per doc  │ │    │
│  │  └───────────────────────────────────────────────────────────────┘ │    │
│  └─────────────────────────────────────────────────────────────────────┘    │
│                                                                               │
│  ┌───────────────────┐  ┌───────────────────┐  ┌───────────────────────┐    │
│  │ struct RadixTree  │  │ struct AvlTree    │  │ struct BoolIndex      │    │
│  │ • exact/prefix    │  │ • range queries   │  │ • true/false buckets  │    │
│  │ • fuzzy (Lev DFA) │  │ • balanced delete │  └───────────────────────┘    │
│  └───────────────────┘  └───────────────────┘                                │
└───────────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────────── SEARCH & ANALYSIS ────────────────────────────┐
│                                                                               │
│  query ──tokenize──▶ terms ──radix find──▶ ids ──BM25──▶ scores               │
│    │                                         │                                │
│    ├── where clause ──▶ filter ids (AND) ────┤                                │
│    └── sortBy ──▶ Sorter (lazy sort, deferred delete) ──▶ page ──▶ hits       │
│                                                                               │
│  ┌────────────────────┐  ┌────────────────────┐  ┌───────────────────────┐   │
│  │ trait Tokenizer    │  │ struct Sorter      │  │ fn bm25               │   │
│  │ • normalize, split │  │ • ordered_docs     │  │ • k1, b, d params     │   │
│  │ • stopwords, stem  │  │ • pending_remove   │  └───────────────────────┘   │
│  └────────────────────┘  └────────────────────┘                              │
└───────────────────────────────────────────────────────────────────────────────┘
*/
