//! Nearest-neighbor queries and their result cursor.

use super::candidate::Candidate;
use super::hnsw::HnswIndex;
use super::search::search_layer;
use crate::error::{Error, Result};
use crate::storage::{GraphStore, RowStore};
use crate::vector::{decode_embedding, VectorRef};
use std::collections::VecDeque;

/// Buffered, ascending-distance result of one query.
///
/// The cursor owns its candidates; it is drained front to back and cannot be
/// rewound. It holds more than `limit` entries whenever the beam was wider
/// than the limit: cutting the stream off is the caller's job, as with a SQL
/// `LIMIT`.
#[derive(Debug, Default)]
pub struct QueryCursor {
    pending: VecDeque<Candidate>,
}

impl QueryCursor {
    /// A cursor that is exhausted from the start.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    fn from_candidates(candidates: Vec<Candidate>) -> Self {
        Self {
            pending: candidates.into(),
        }
    }

    /// Entries not yet consumed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns true once every entry has been consumed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// The next entry, without consuming it.
    #[must_use]
    pub fn peek(&self) -> Option<&Candidate> {
        self.pending.front()
    }

    /// Consumes the next entry without resolving its row.
    pub fn next_candidate(&mut self) -> Option<Candidate> {
        self.pending.pop_front()
    }

    /// Consumes the next entry and fetches its row.
    ///
    /// Returns `Ok(None)` once the cursor is exhausted. The entry is consumed
    /// even if the row lookup fails.
    ///
    /// # Errors
    ///
    /// Propagates [`RowStore::fetch_row`] failures.
    pub fn next_row<R: RowStore + ?Sized>(&mut self, rows: &R) -> Result<Option<R::Row>> {
        match self.pending.pop_front() {
            Some(candidate) => rows.fetch_row(candidate.reference()).map(Some),
            None => Ok(None),
        }
    }

    /// Drains the cursor into row lookups.
    pub fn rows<'a, R: RowStore + ?Sized>(
        &'a mut self,
        rows: &'a R,
    ) -> impl Iterator<Item = Result<R::Row>> + 'a {
        std::iter::from_fn(move || self.next_row(rows).transpose())
    }

    /// References still pending, nearest first.
    pub fn references(&self) -> impl Iterator<Item = &VectorRef> + '_ {
        self.pending.iter().map(Candidate::reference)
    }
}

impl Iterator for QueryCursor {
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        self.next_candidate()
    }
}

impl<S: GraphStore> HnswIndex<S> {
    /// Starts a query for the rows nearest to `query`.
    ///
    /// Descends greedily from the entry point to layer 1, then runs a beam
    /// search on layer 0 whose width is chosen by
    /// [`HnswParams::query_ef`](super::HnswParams::query_ef) from `limit`.
    /// An empty graph yields an exhausted cursor.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidEmbedding`] if `query` is empty
    /// - [`Error::DimensionMismatch`] if `query` disagrees with the indexed vectors
    /// - any store error, unchanged
    pub fn first(&self, query: &[f32], limit: usize) -> Result<QueryCursor> {
        if query.is_empty() {
            return Err(Error::InvalidEmbedding("query embedding is empty".to_string()));
        }

        let Some(max_layer) = self.store.max_layer()? else {
            return Ok(QueryCursor::empty());
        };

        let entry = self.entry_vector()?;
        let nearest = self.greedy_descent(query, entry, max_layer, 0)?;
        let ef = self.params.query_ef(limit);
        let candidates = search_layer(&self.store, query, [nearest], ef, 0)?;

        Ok(QueryCursor::from_candidates(candidates))
    }

    /// Same as [`HnswIndex::first`] for a query given in embedding column format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEmbedding`] if `query` is empty or not a multiple
    /// of 4 bytes, then anything [`HnswIndex::first`] returns.
    pub fn first_bytes(&self, query: &[u8], limit: usize) -> Result<QueryCursor> {
        let query = decode_embedding(query)?;
        self.first(&query, limit)
    }
}
