//! HNSW index parameters.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Hard upper bound on any neighbor list.
pub const HNSW_MAX_M: usize = 10_000;

/// Default per-layer neighbor cap (M). Layer 0 allows twice as many.
pub const DEFAULT_MAX_CONNECTIONS: usize = 24;

/// Default number of neighbors a new node links to per layer.
pub const DEFAULT_MAX_INSERT_CONNECTIONS: usize = 24;

/// Default candidate list size during construction.
pub const DEFAULT_EF_CONSTRUCTION: usize = 200;

/// Default beam width for the final layer-0 search of a query.
pub const DEFAULT_EF_SEARCH: usize = 40;

/// Default multiplier applied to `-ln(U)` when sampling a node's top layer.
pub const DEFAULT_NORMALIZATION_FACTOR: f64 = 2.0;

/// How the layer-0 beam width of a query is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchWidth {
    /// Always `ef_search`, whatever the requested limit.
    Fixed,
    /// `max(ef_search, limit)`.
    #[default]
    AtLeastLimit,
}

/// HNSW tuning parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HnswParams {
    /// Neighbor cap above layer 0 (M). Layer 0 holds up to `2 * M`.
    pub max_connections: usize,
    /// Neighbors selected for a new node on each layer it joins, never more
    /// than that layer's cap.
    pub max_insert_connections: usize,
    /// Beam width used while linking a new node.
    pub ef_construction: usize,
    /// Base beam width for queries.
    pub ef_search: usize,
    /// Query beam width policy.
    pub search_width: SearchWidth,
    /// Level multiplier: top layer = `floor(-ln(U) * normalization_factor)`.
    pub normalization_factor: f64,
}

impl Default for HnswParams {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            max_insert_connections: DEFAULT_MAX_INSERT_CONNECTIONS,
            ef_construction: DEFAULT_EF_CONSTRUCTION,
            ef_search: DEFAULT_EF_SEARCH,
            search_width: SearchWidth::default(),
            normalization_factor: DEFAULT_NORMALIZATION_FACTOR,
        }
    }
}

impl HnswParams {
    /// Neighbor cap for `layer`: `2 * M` on layer 0, `M` above it.
    ///
    /// Saturates instead of overflowing, so out-of-range `M` reaches
    /// [`HnswParams::validate`].
    #[must_use]
    pub const fn max_neighbors(&self, layer: usize) -> usize {
        if layer == 0 {
            self.max_connections.saturating_mul(2)
        } else {
            self.max_connections
        }
    }

    /// Neighbors a new node links to on `layer`.
    #[must_use]
    pub fn insert_connections(&self, layer: usize) -> usize {
        self.max_insert_connections.min(self.max_neighbors(layer))
    }

    /// Layer-0 beam width for a query asking for `limit` rows.
    #[must_use]
    pub fn query_ef(&self, limit: usize) -> usize {
        match self.search_width {
            SearchWidth::Fixed => self.ef_search,
            SearchWidth::AtLeastLimit => self.ef_search.max(limit),
        }
    }

    /// Checks that the parameters describe a buildable graph.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.max_connections == 0 || self.max_neighbors(0) > HNSW_MAX_M {
            return Err(Error::InvalidArgument(format!(
                "max_connections {} is out of range [1, {}]",
                self.max_connections,
                HNSW_MAX_M / 2
            )));
        }
        if self.max_insert_connections == 0 || self.max_insert_connections > HNSW_MAX_M {
            return Err(Error::InvalidArgument(format!(
                "max_insert_connections {} is out of range [1, {HNSW_MAX_M}]",
                self.max_insert_connections
            )));
        }
        if self.ef_construction == 0 {
            return Err(Error::InvalidArgument(
                "ef_construction must be at least 1".to_string(),
            ));
        }
        if self.ef_search == 0 {
            return Err(Error::InvalidArgument(
                "ef_search must be at least 1".to_string(),
            ));
        }
        if !self.normalization_factor.is_finite() || self.normalization_factor <= 0.0 {
            return Err(Error::InvalidArgument(format!(
                "normalization_factor {} must be a positive finite number",
                self.normalization_factor
            )));
        }
        Ok(())
    }
}
