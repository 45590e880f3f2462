//! HNSW index over a [`GraphStore`].
//!
//! The index keeps no graph state of its own: neighbor lists, the max layer
//! and the entry point all live in the store, and vectors are fetched from the
//! row store on demand. What the index owns is the tuning parameters and the
//! random source used to assign layers.
//!
//! # Concurrency
//!
//! [`HnswIndex::insert`] takes `&mut self`, queries take `&self`. Within one
//! process the borrow checker therefore serializes writers against each other
//! and against readers. A store shared by several processes still sees plain
//! read-modify-write updates of neighbor lists, so two writers touching the
//! same `(layer, node)` record can lose an update; such deployments must hold
//! a table-level lock around inserts.

use super::level::LevelSampler;
use super::params::HnswParams;
use super::search::search_layer;
use crate::config::AnnexConfig;
use crate::error::{Error, Result};
use crate::storage::GraphStore;
use crate::vector::Vector;

/// Hierarchical navigable small world index.
#[derive(Debug)]
pub struct HnswIndex<S> {
    pub(super) store: S,
    pub(super) params: HnswParams,
    pub(super) sampler: LevelSampler,
}

impl<S: GraphStore> HnswIndex<S> {
    /// Creates an index with default parameters and an OS-seeded level sampler.
    #[must_use]
    pub fn new(store: S) -> Self {
        let params = HnswParams::default();
        Self {
            store,
            sampler: LevelSampler::new(params.normalization_factor),
            params,
        }
    }

    /// Creates an index with custom parameters.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidArgument`] if the parameters are invalid.
    pub fn with_params(store: S, params: HnswParams) -> Result<Self> {
        let sampler = LevelSampler::new(params.normalization_factor);
        Self::with_sampler(store, params, sampler)
    }

    /// Creates an index with custom parameters and an injected level sampler.
    ///
    /// The sampler's own normalization factor wins over `params`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the parameters are invalid or the
    /// layer-0 cap does not fit in one of the store's records.
    pub fn with_sampler(store: S, params: HnswParams, sampler: LevelSampler) -> Result<Self> {
        let params = HnswParams {
            normalization_factor: sampler.normalization_factor(),
            ..params
        };
        params.validate()?;
        let capacity = store.neighbor_capacity();
        if params.max_neighbors(0) > capacity {
            return Err(Error::InvalidArgument(format!(
                "layer-0 cap of {} neighbors exceeds the store's record capacity of {capacity}",
                params.max_neighbors(0)
            )));
        }
        Ok(Self {
            store,
            params,
            sampler,
        })
    }

    /// Creates an index from the `[hnsw]` and `[search]` configuration sections.
    ///
    /// A configured `hnsw.seed` yields a reproducible level sequence.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidArgument`] if the resulting parameters are invalid.
    pub fn from_config(store: S, config: &AnnexConfig) -> Result<Self> {
        let params = config.hnsw_params();
        let sampler = match config.hnsw.seed {
            Some(seed) => LevelSampler::with_seed(params.normalization_factor, seed),
            None => LevelSampler::new(params.normalization_factor),
        };
        Self::with_sampler(store, params, sampler)
    }

    /// Tuning parameters.
    #[must_use]
    pub fn params(&self) -> &HnswParams {
        &self.params
    }

    /// The backing store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the backing store, e.g. to append rows before indexing them.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Consumes the index and returns its store.
    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }

    /// Highest populated layer, `None` for an empty graph.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub fn max_layer(&self) -> Result<Option<usize>> {
        self.store.max_layer()
    }

    /// Returns true if no node has been indexed yet.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.store.max_layer()?.is_none())
    }

    /// Fetches the entry point vector.
    pub(super) fn entry_vector(&self) -> Result<Vector> {
        let entry = self.store.entry_point()?;
        self.store.fetch_vector(&entry)
    }

    /// Walks from `top` down to `bottom` (exclusive) keeping only the single
    /// nearest node per layer.
    pub(super) fn greedy_descent(
        &self,
        target: &[f32],
        entry: Vector,
        top: usize,
        bottom: usize,
    ) -> Result<Vector> {
        let mut current = entry;
        for layer in (bottom + 1..=top).rev() {
            let nearest = search_layer(&self.store, target, [current.clone()], 1, layer)?;
            if let Some(best) = nearest.into_iter().next() {
                current = best.into_vector();
            }
        }
        Ok(current)
    }
}
