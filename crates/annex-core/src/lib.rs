//! # `annex` Core
//!
//! Approximate nearest-neighbor secondary index for a relational engine.
//!
//! Vectors live in an ordinary table column as packed 4-byte floats; the index
//! adds a Hierarchical Navigable Small World graph stored as a second relation
//! keyed by `(layer, src)`. Inserts link each new row into that graph and
//! queries walk it to return rows ordered by Euclidean distance.
//!
//! ## Features
//!
//! - **Pluggable storage**: the graph is read and written through [`GraphStore`]
//! - **Explicit SIMD**: squared L2 distance via `wide::f32x8`
//! - **Reproducible builds**: injectable level sampler with optional fixed seed
//! - **Layered config**: `annex.toml` + `ANNEX_*` environment variables
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use annex_core::VectorTable;
//! use serde_json::json;
//!
//! let table = VectorTable::new();
//! table.insert(&[0.0, 0.0], Some(json!({"name": "origin"})))?;
//! table.insert(&[3.0, 4.0], None)?;
//!
//! let hits = table.search(&[1.0, 1.0], 1)?;
//! assert_eq!(hits[0].row.payload, Some(json!({"name": "origin"})));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)] // Acceptable for f32/f64 conversions
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]

pub mod config;
pub mod distance;
#[cfg(test)]
mod distance_tests;
pub mod error;
pub mod index;
pub mod storage;
pub mod table;
pub mod vector;
#[cfg(test)]
mod vector_tests;

pub use config::{AnnexConfig, ConfigError, HnswConfig, LoggingConfig, SearchConfig};
pub use error::{Error, ErrorKind, Result};
pub use index::{
    search_layer, select_neighbors, Candidate, HnswIndex, HnswParams, InsertOutcome,
    LevelSampler, QueryCursor, SearchWidth,
};
pub use storage::{GraphStats, GraphStore, LayerStats, MemoryStore, Row, RowStore};
pub use table::{SearchHit, VectorTable};
pub use vector::{decode_embedding, encode_embedding, Vector, VectorRef};
