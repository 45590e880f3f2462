//! Linking a new node into the graph.

use super::candidate::Candidate;
use super::hnsw::HnswIndex;
use super::search::search_layer;
use super::select::{select_nearest, select_neighbors};
use crate::error::{Error, Result};
use crate::storage::GraphStore;
use crate::vector::{Vector, VectorRef};

/// Where a node ended up after [`HnswIndex::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertOutcome {
    /// Top layer assigned to the node.
    pub level: usize,
    /// Max layer of the graph before the insert, `None` if it was empty.
    pub previous_max_layer: Option<usize>,
}

impl InsertOutcome {
    /// True if the node now sits alone on a new top layer.
    #[must_use]
    pub fn is_new_entry_point(&self) -> bool {
        self.previous_max_layer.map_or(true, |max| self.level > max)
    }
}

impl<S: GraphStore> HnswIndex<S> {
    /// Indexes the row `reference` whose embedding column holds `embedding`.
    ///
    /// The row must already be resolvable through the store and hold the same
    /// embedding; the graph never links a node queries cannot fetch. The first node
    /// of an empty graph only gets an empty layer-0 list; every later node is
    /// linked on each layer from `min(max_layer, level)` down to 0 and becomes
    /// the sole occupant of any layer above the old max layer.
    ///
    /// Nothing is rolled back on failure: an error half-way through linking
    /// can leave one-sided edges behind.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidEmbedding`] if `embedding` is empty or not a multiple of 4 bytes
    /// - [`Error::RowNotFound`] if `reference` does not resolve through the store
    /// - [`Error::InvalidArgument`] if `reference` is already indexed or its row
    ///   holds a different embedding
    /// - any store error, unchanged
    pub fn insert(&mut self, reference: &VectorRef, embedding: &[u8]) -> Result<InsertOutcome> {
        let target = Vector::from_bytes(reference.clone(), embedding)?;
        self.ensure_row_matches(&target)?;

        let Some(max_layer) = self.store.max_layer()? else {
            self.store.put_neighbors(0, reference, &[])?;
            tracing::debug!(node = %reference, "first node of an empty graph");
            return Ok(InsertOutcome {
                level: 0,
                previous_max_layer: None,
            });
        };

        match self.store.get_neighbors(0, reference) {
            Ok(_) => {
                return Err(Error::InvalidArgument(format!(
                    "node {reference} is already indexed"
                )))
            }
            Err(Error::NeighborsNotFound { .. }) => {}
            Err(err) => return Err(err),
        }

        let level = self.sampler.sample();
        tracing::debug!(node = %reference, level, max_layer, "inserting node");

        let entry = self.entry_vector()?;
        let nearest = self.greedy_descent(target.embedding(), entry, max_layer, level)?;

        let mut start_nodes = vec![nearest];
        for layer in (0..=max_layer.min(level)).rev() {
            let candidates = search_layer(
                &self.store,
                target.embedding(),
                start_nodes,
                self.params.ef_construction,
                layer,
            )?;
            let selected = select_nearest(
                candidates.iter().cloned(),
                self.params.insert_connections(layer),
            );
            self.link(layer, &target, &selected)?;
            start_nodes = candidates.into_iter().map(Candidate::into_vector).collect();
        }

        for layer in max_layer + 1..=level {
            self.store.put_neighbors(layer, reference, &[])?;
        }
        if level > max_layer {
            tracing::debug!(node = %reference, from = max_layer, to = level, "max layer grew");
        }

        Ok(InsertOutcome {
            level,
            previous_max_layer: Some(max_layer),
        })
    }

    /// Checks that the store resolves `target` to the same embedding.
    fn ensure_row_matches(&self, target: &Vector) -> Result<()> {
        let stored = self.store.fetch_vector(target.reference())?;
        let same = stored.dimension() == target.dimension()
            && stored
                .embedding()
                .iter()
                .zip(target.embedding())
                .all(|(a, b)| a.to_bits() == b.to_bits());
        if same {
            Ok(())
        } else {
            Err(Error::InvalidArgument(format!(
                "row {} holds a different embedding than the one being indexed",
                target.reference()
            )))
        }
    }

    /// Writes `node`'s list at `layer` and adds the reverse edge to every
    /// selected neighbor, pruning lists that exceed the layer's cap.
    fn link(&mut self, layer: usize, node: &Vector, selected: &[Candidate]) -> Result<()> {
        let refs: Vec<VectorRef> = selected.iter().map(|c| c.reference().clone()).collect();
        self.store.put_neighbors(layer, node.reference(), &refs)?;

        let cap = self.params.max_neighbors(layer);
        for neighbor in selected {
            let mut list = self.store.get_neighbors(layer, neighbor.reference())?;
            list.push(node.reference().clone());

            if list.len() > cap {
                list = self.prune(neighbor.vector(), node, &list, cap)?;
            }
            self.store.put_neighbors(layer, neighbor.reference(), &list)?;
        }
        Ok(())
    }

    /// Keeps the `cap` entries of `list` nearest to `owner`.
    fn prune(
        &self,
        owner: &Vector,
        inserted: &Vector,
        list: &[VectorRef],
        cap: usize,
    ) -> Result<Vec<VectorRef>> {
        let vectors = list
            .iter()
            .map(|reference| {
                if reference == inserted.reference() {
                    Ok(inserted.clone())
                } else {
                    let vector = self.store.fetch_vector(reference)?;
                    vector.ensure_dimension(owner.dimension())?;
                    Ok(vector)
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(select_neighbors(owner.embedding(), vectors, cap)
            .into_iter()
            .map(|candidate| candidate.reference().clone())
            .collect())
    }
}
