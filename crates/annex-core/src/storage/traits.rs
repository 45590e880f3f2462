//! Storage seams consumed by the index.

use crate::error::Result;
use crate::index::HNSW_MAX_M;
use crate::vector::{Vector, VectorRef};

/// The persisted `(layer, src) -> neighbors` relation plus vector lookup.
///
/// Implementations are driven synchronously by one index operation at a time.
/// Writers must be serialized by the caller: `put_neighbors` takes `&mut self`,
/// and every neighbor-list update the index performs is a plain
/// read-modify-write.
pub trait GraphStore {
    /// Reads the neighbor list of `node` at `layer`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NeighborsNotFound`] if no record exists and
    /// [`crate::Error::Corruption`] if the stored list cannot be decoded.
    fn get_neighbors(&self, layer: usize, node: &VectorRef) -> Result<Vec<VectorRef>>;

    /// Creates or overwrites the neighbor list of `node` at `layer`.
    fn put_neighbors(&mut self, layer: usize, node: &VectorRef, neighbors: &[VectorRef])
        -> Result<()>;

    /// Highest layer holding any record, `None` for a brand-new index.
    fn max_layer(&self) -> Result<Option<usize>>;

    /// A node stored on the current max layer.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NeighborsNotFound`] on an empty graph.
    fn entry_point(&self) -> Result<VectorRef>;

    /// Resolves a reference to its row and decodes the embedding.
    fn fetch_vector(&self, node: &VectorRef) -> Result<Vector>;

    /// Longest neighbor list a single record can hold.
    fn neighbor_capacity(&self) -> usize {
        HNSW_MAX_M
    }
}

/// Random-access row lookup used when a query cursor is drained.
pub trait RowStore {
    /// Row type handed back to the caller.
    type Row;

    /// Fetches the row addressed by `reference`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::RowNotFound`] if the reference does not resolve.
    fn fetch_row(&self, reference: &VectorRef) -> Result<Self::Row>;
}
