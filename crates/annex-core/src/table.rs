//! Thread-safe table with an HNSW secondary index.
//!
//! [`VectorTable`] bundles a [`MemoryStore`] and the [`HnswIndex`] built over
//! it behind one `parking_lot::RwLock`, the in-process equivalent of the
//! table-level lock a storage engine takes around index maintenance: inserts
//! hold the write lock for the whole row-plus-graph update, searches share
//! the read lock.

use crate::config::AnnexConfig;
use crate::error::{Error, Result};
use crate::index::{HnswIndex, HnswParams};
use crate::storage::{GraphStats, GraphStore, MemoryStore, Row, RowStore};
use crate::vector::{decode_embedding, encode_embedding, VectorRef};
use parking_lot::RwLock;

/// One row returned by [`VectorTable::search`].
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    /// The matching row.
    pub row: Row,
    /// Euclidean distance between the row's embedding and the query.
    pub distance: f32,
}

#[derive(Debug)]
struct TableState {
    index: HnswIndex<MemoryStore>,
    dimension: Option<usize>,
}

/// A table of embeddings with an HNSW index kept in sync on every insert.
#[derive(Debug)]
pub struct VectorTable {
    state: RwLock<TableState>,
}

impl Default for VectorTable {
    fn default() -> Self {
        Self::new()
    }
}

impl VectorTable {
    /// Creates an empty table with default index parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::from_index(HnswIndex::new(MemoryStore::new()))
    }

    /// Creates an empty table with custom index parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the parameters are invalid.
    pub fn with_params(params: HnswParams) -> Result<Self> {
        Ok(Self::from_index(HnswIndex::with_params(
            MemoryStore::new(),
            params,
        )?))
    }

    /// Creates an empty table configured from `annex.toml`-style settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration does not validate.
    pub fn from_config(config: &AnnexConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_index(HnswIndex::from_config(
            MemoryStore::new(),
            config,
        )?))
    }

    fn from_index(index: HnswIndex<MemoryStore>) -> Self {
        Self {
            state: RwLock::new(TableState {
                index,
                dimension: None,
            }),
        }
    }

    /// Appends a row and links it into the index.
    ///
    /// The first row fixes the table's dimension.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidEmbedding`] if `embedding` is empty
    /// - [`Error::DimensionMismatch`] if it disagrees with earlier rows
    /// - any index error; the row is kept only if the graph already references it
    pub fn insert(
        &self,
        embedding: &[f32],
        payload: Option<serde_json::Value>,
    ) -> Result<VectorRef> {
        if embedding.is_empty() {
            return Err(Error::InvalidEmbedding("embedding is empty".to_string()));
        }

        let mut state = self.state.write();
        if let Some(expected) = state.dimension {
            if expected != embedding.len() {
                return Err(Error::DimensionMismatch {
                    expected,
                    actual: embedding.len(),
                });
            }
        }

        let bytes = encode_embedding(embedding);
        let reference = state
            .index
            .store_mut()
            .insert_row(bytes.clone(), payload)?;

        match state.index.insert(&reference, &bytes) {
            Ok(outcome) => {
                state.dimension = Some(embedding.len());
                tracing::debug!(
                    row = %reference,
                    level = outcome.level,
                    new_entry_point = outcome.is_new_entry_point(),
                    "row indexed"
                );
                Ok(reference)
            }
            Err(err) => {
                let store = state.index.store_mut();
                let linked = store.record_keys().any(|(_, node)| *node == reference);
                if !linked {
                    store.remove_row(&reference);
                }
                tracing::warn!(row = %reference, error = %err, linked, "index insert failed");
                Err(err)
            }
        }
    }

    /// Same as [`VectorTable::insert`] for an embedding in column format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEmbedding`] for malformed bytes, then anything
    /// [`VectorTable::insert`] returns.
    pub fn insert_bytes(
        &self,
        embedding: &[u8],
        payload: Option<serde_json::Value>,
    ) -> Result<VectorRef> {
        let values = decode_embedding(embedding)?;
        self.insert(&values, payload)
    }

    /// Returns up to `limit` rows nearest to `query`, nearest first.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidEmbedding`] if `query` is empty
    /// - [`Error::DimensionMismatch`] if `query` disagrees with the table
    /// - any index or row store error
    pub fn search(&self, query: &[f32], limit: usize) -> Result<Vec<SearchHit>> {
        let state = self.state.read();
        if let Some(expected) = state.dimension {
            if expected != query.len() && !query.is_empty() {
                return Err(Error::DimensionMismatch {
                    expected,
                    actual: query.len(),
                });
            }
        }

        let cursor = state.index.first(query, limit)?;
        let store = state.index.store();
        cursor
            .take(limit)
            .map(|candidate| {
                Ok(SearchHit {
                    row: store.fetch_row(candidate.reference())?,
                    distance: candidate.distance(),
                })
            })
            .collect()
    }

    /// Fetches a row by reference.
    #[must_use]
    pub fn get(&self, reference: &VectorRef) -> Option<Row> {
        self.state.read().index.store().row(reference).cloned()
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.read().index.store().row_count()
    }

    /// Returns true if the table holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dimension fixed by the first row, if any.
    #[must_use]
    pub fn dimension(&self) -> Option<usize> {
        self.state.read().dimension
    }

    /// Index parameters.
    #[must_use]
    pub fn params(&self) -> HnswParams {
        *self.state.read().index.params()
    }

    /// Highest populated graph layer.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub fn max_layer(&self) -> Result<Option<usize>> {
        self.state.read().index.store().max_layer()
    }

    /// Per-layer graph summary.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Corruption`] if a stored neighbor list is unreadable.
    pub fn stats(&self) -> Result<GraphStats> {
        self.state.read().index.store().stats()
    }
}
