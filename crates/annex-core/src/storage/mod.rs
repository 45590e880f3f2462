//! Storage seams and the in-memory relation store.
//!
//! # Public Types
//!
//! - [`GraphStore`], [`RowStore`]: traits the index is written against
//! - [`MemoryStore`]: rows plus graph relation held in memory
//! - [`neighbor_codec`]: the neighbor-list blob format

mod memory;
pub mod neighbor_codec;
mod traits;


pub use memory::{
    GraphStats, LayerStats, MemoryStore, Row, MAX_NEIGHBORS_BLOB_LEN, MAX_REF_LENGTH,
    ROW_REF_LENGTH,
};
pub use traits::{GraphStore, RowStore};
