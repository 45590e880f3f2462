//! HNSW graph index.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ HnswIndex<S: GraphStore>                     │
//! │   insert()  ── sample level ─┐               │
//! │   first()   ── greedy descent (ef = 1) ──┐   │
//! │                              └─ search_layer │
//! │                                 select_*     │
//! ├──────────────────────────────────────────────┤
//! │ GraphStore: (layer, src) -> [neighbors]      │
//! │             fetch_vector(ref)                │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! # References
//!
//! - Paper: "Efficient and robust approximate nearest neighbor search
//!   using Hierarchical Navigable Small World graphs" (Malkov & Yashunin, 2016)
//! - arXiv: <https://arxiv.org/abs/1603.09320>

mod candidate;
mod hnsw;
mod insert;
mod level;
mod params;
mod query;
mod search;
mod select;

pub use candidate::Candidate;
pub use hnsw::HnswIndex;
pub use insert::InsertOutcome;
pub use level::{LevelSampler, MAX_LEVEL};
pub use params::{
    HnswParams, SearchWidth, DEFAULT_EF_CONSTRUCTION, DEFAULT_EF_SEARCH,
    DEFAULT_MAX_CONNECTIONS, DEFAULT_MAX_INSERT_CONNECTIONS, DEFAULT_NORMALIZATION_FACTOR,
    HNSW_MAX_M,
};
pub use query::QueryCursor;
pub use search::search_layer;
pub use select::select_neighbors;

#[cfg(test)]
mod search_tests;
#[cfg(test)]
mod select_tests;
#[cfg(test)]
mod test_support;
