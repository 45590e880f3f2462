//! In-memory relation store.
//!
//! Holds the two relations an index touches: the indexed table's rows
//! (addressed by positional references) and the graph relation
//! `(layer, src) -> neighbors`, kept ordered by its unique key so that the
//! highest layer and its first node can be found with a reverse scan.

use super::neighbor_codec::{decode_neighbors, encode_neighbors, encoded_len};
use super::traits::{GraphStore, RowStore};
use crate::error::{Error, Result};
use crate::index::HNSW_MAX_M;
use crate::vector::{decode_embedding, Vector, VectorRef};
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::collections::BTreeMap;

/// Maximum length of a `src` key in the graph relation.
pub const MAX_REF_LENGTH: usize = 255;

/// Maximum size of an encoded neighbor list in the graph relation.
pub const MAX_NEIGHBORS_BLOB_LEN: usize = 10_000;

/// Length of positional row references.
pub const ROW_REF_LENGTH: usize = 8;

/// A row of the indexed table.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Positional reference of the row.
    pub reference: VectorRef,
    /// Raw embedding column value.
    pub embedding: Vec<u8>,
    /// Optional JSON payload stored alongside the vector.
    pub payload: Option<serde_json::Value>,
}

impl Row {
    /// Decodes the embedding column.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEmbedding`] if the column value is malformed.
    pub fn vector(&self) -> Result<Vector> {
        Vector::from_bytes(self.reference.clone(), &self.embedding)
    }

    /// Decodes only the embedding values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEmbedding`] if the column value is malformed.
    pub fn embedding_values(&self) -> Result<Vec<f32>> {
        decode_embedding(&self.embedding)
    }
}

/// Degree summary of one graph layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LayerStats {
    /// Layer number.
    pub layer: usize,
    /// Nodes with a record on this layer.
    pub nodes: usize,
    /// Directed edges stored on this layer.
    pub edges: usize,
    /// Longest neighbor list on this layer.
    pub max_degree: usize,
}

/// Per-layer summary of the graph relation, lowest layer first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    /// One entry per populated layer.
    pub layers: Vec<LayerStats>,
}

impl GraphStats {
    /// Highest populated layer.
    #[must_use]
    pub fn max_layer(&self) -> Option<usize> {
        self.layers.last().map(|stats| stats.layer)
    }

    /// Stats for `layer`, if populated.
    #[must_use]
    pub fn layer(&self, layer: usize) -> Option<&LayerStats> {
        self.layers.iter().find(|stats| stats.layer == layer)
    }
}

/// Rows plus graph relation, all in memory.
#[derive(Debug)]
pub struct MemoryStore {
    ref_length: usize,
    graph: BTreeMap<(usize, VectorRef), Vec<u8>>,
    rows: FxHashMap<VectorRef, Row>,
    next_position: u64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Creates an empty store using 8-byte positional references.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ref_length: ROW_REF_LENGTH,
            graph: BTreeMap::new(),
            rows: FxHashMap::default(),
            next_position: 0,
        }
    }

    /// Creates an empty store for caller-supplied references of `ref_length` bytes.
    ///
    /// Longer references leave room for fewer neighbors per record, see
    /// [`GraphStore::neighbor_capacity`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] unless `1 <= ref_length <= 255`.
    pub fn with_ref_length(ref_length: usize) -> Result<Self> {
        if ref_length == 0 || ref_length > MAX_REF_LENGTH {
            return Err(Error::InvalidArgument(format!(
                "reference length {ref_length} is out of range [1, {MAX_REF_LENGTH}]"
            )));
        }
        Ok(Self {
            ref_length,
            ..Self::new()
        })
    }

    /// Length of every reference in this store.
    #[must_use]
    pub fn ref_length(&self) -> usize {
        self.ref_length
    }

    /// Appends a row and returns its positional reference.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the store was created with a
    /// reference length other than [`ROW_REF_LENGTH`].
    pub fn insert_row(
        &mut self,
        embedding: Vec<u8>,
        payload: Option<serde_json::Value>,
    ) -> Result<VectorRef> {
        if self.ref_length != ROW_REF_LENGTH {
            return Err(Error::InvalidArgument(format!(
                "positional references need {ROW_REF_LENGTH}-byte keys, store uses {}",
                self.ref_length
            )));
        }
        let reference = VectorRef::from_position(self.next_position);
        self.next_position += 1;
        self.rows.insert(
            reference.clone(),
            Row {
                reference: reference.clone(),
                embedding,
                payload,
            },
        );
        Ok(reference)
    }

    /// Stores a row under a caller-supplied reference.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the reference has the wrong length
    /// or is already taken.
    pub fn insert_row_with_ref(
        &mut self,
        reference: VectorRef,
        embedding: Vec<u8>,
        payload: Option<serde_json::Value>,
    ) -> Result<()> {
        self.check_ref(&reference)?;
        if self.rows.contains_key(&reference) {
            return Err(Error::InvalidArgument(format!(
                "row {reference} already exists"
            )));
        }
        self.rows.insert(
            reference.clone(),
            Row {
                reference,
                embedding,
                payload,
            },
        );
        Ok(())
    }

    /// Removes a row. Graph records pointing at it are left untouched.
    pub fn remove_row(&mut self, reference: &VectorRef) -> Option<Row> {
        self.rows.remove(reference)
    }

    /// Returns a row without going through [`RowStore`].
    #[must_use]
    pub fn row(&self, reference: &VectorRef) -> Option<&Row> {
        self.rows.get(reference)
    }

    /// Number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of `(layer, src)` records in the graph relation.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.graph.len()
    }

    /// Iterates the graph relation keys in `(layer, src)` order.
    pub fn record_keys(&self) -> impl Iterator<Item = (usize, &VectorRef)> + '_ {
        self.graph.keys().map(|(layer, node)| (*layer, node))
    }

    /// Raw encoded neighbor list.
    #[must_use]
    pub fn raw_record(&self, layer: usize, node: &VectorRef) -> Option<&[u8]> {
        self.graph
            .get(&(layer, node.clone()))
            .map(Vec::as_slice)
    }

    /// Overwrites a record with an already encoded blob, bypassing the codec.
    ///
    /// Used by repair tooling that copies relations verbatim.
    pub fn put_raw_record(&mut self, layer: usize, node: VectorRef, blob: Vec<u8>) {
        self.graph.insert((layer, node), blob);
    }

    /// Computes node, edge and degree counts per layer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Corruption`] if any record fails to decode.
    pub fn stats(&self) -> Result<GraphStats> {
        let mut layers: Vec<LayerStats> = Vec::new();
        for ((layer, _), blob) in &self.graph {
            let degree = decode_neighbors(blob, self.ref_length)?.len();
            match layers.last_mut() {
                Some(stats) if stats.layer == *layer => {
                    stats.nodes += 1;
                    stats.edges += degree;
                    stats.max_degree = stats.max_degree.max(degree);
                }
                _ => layers.push(LayerStats {
                    layer: *layer,
                    nodes: 1,
                    edges: degree,
                    max_degree: degree,
                }),
            }
        }
        Ok(GraphStats { layers })
    }

    fn check_ref(&self, reference: &VectorRef) -> Result<()> {
        if reference.len() == self.ref_length {
            Ok(())
        } else {
            Err(Error::InvalidArgument(format!(
                "reference {reference} is {} bytes, store uses {}",
                reference.len(),
                self.ref_length
            )))
        }
    }
}

impl GraphStore for MemoryStore {
    fn get_neighbors(&self, layer: usize, node: &VectorRef) -> Result<Vec<VectorRef>> {
        let blob = self
            .graph
            .get(&(layer, node.clone()))
            .ok_or_else(|| Error::NeighborsNotFound {
                layer,
                node: node.clone(),
            })?;
        decode_neighbors(blob, self.ref_length)
    }

    fn put_neighbors(
        &mut self,
        layer: usize,
        node: &VectorRef,
        neighbors: &[VectorRef],
    ) -> Result<()> {
        self.check_ref(node)?;
        let blob = encode_neighbors(neighbors, self.ref_length)?;
        if blob.len() > MAX_NEIGHBORS_BLOB_LEN {
            return Err(Error::Storage(format!(
                "neighbor list of {} bytes exceeds the column limit of {MAX_NEIGHBORS_BLOB_LEN}",
                blob.len()
            )));
        }
        self.graph.insert((layer, node.clone()), blob);
        Ok(())
    }

    fn max_layer(&self) -> Result<Option<usize>> {
        Ok(self.graph.keys().next_back().map(|(layer, _)| *layer))
    }

    fn entry_point(&self) -> Result<VectorRef> {
        let Some(max_layer) = self.max_layer()? else {
            return Err(Error::NeighborsNotFound {
                layer: 0,
                node: VectorRef::default(),
            });
        };
        self.graph
            .range((max_layer, VectorRef::default())..)
            .next()
            .map(|((_, node), _)| node.clone())
            .ok_or_else(|| Error::Storage(format!("layer {max_layer} vanished during scan")))
    }

    fn fetch_vector(&self, node: &VectorRef) -> Result<Vector> {
        let row = self
            .rows
            .get(node)
            .ok_or_else(|| Error::RowNotFound(node.clone()))?;
        row.vector()
    }

    fn neighbor_capacity(&self) -> usize {
        let fits = (MAX_NEIGHBORS_BLOB_LEN - encoded_len(0, self.ref_length)) / self.ref_length;
        fits.min(HNSW_MAX_M)
    }
}

impl RowStore for MemoryStore {
    type Row = Row;

    fn fetch_row(&self, reference: &VectorRef) -> Result<Row> {
        self.rows
            .get(reference)
            .cloned()
            .ok_or_else(|| Error::RowNotFound(reference.clone()))
    }
}
