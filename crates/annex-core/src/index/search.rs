//! Bounded beam search within one graph layer.

use super::candidate::Candidate;
use crate::error::{Error, Result};
use crate::storage::GraphStore;
use crate::vector::{Vector, VectorRef};
use rustc_hash::FxHashSet;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Searches `layer` for up to `ef` nodes nearest to `target`.
///
/// Expansion is best-first from `start_nodes`: the candidate queue pops the
/// nearest unexpanded node, the result set keeps the `ef` nearest nodes seen so
/// far, and the search stops once the nearest unexpanded node is farther than
/// the farthest kept result of a full result set. Every returned node is a
/// start node or reachable from one over edges recorded at `layer`.
///
/// Returns the result set ascending by distance.
///
/// # Errors
///
/// - [`Error::InvalidArgument`] if `start_nodes` is empty or `ef` is 0
/// - [`Error::DimensionMismatch`] if a visited vector disagrees with `target`
/// - any error of [`GraphStore::get_neighbors`] or [`GraphStore::fetch_vector`]
pub fn search_layer<S: GraphStore + ?Sized>(
    store: &S,
    target: &[f32],
    start_nodes: impl IntoIterator<Item = Vector>,
    ef: usize,
    layer: usize,
) -> Result<Vec<Candidate>> {
    if ef == 0 {
        return Err(Error::InvalidArgument(
            "search width (ef) must be at least 1".to_string(),
        ));
    }

    let mut visited: FxHashSet<VectorRef> = FxHashSet::default();
    let mut candidates: BinaryHeap<Reverse<Candidate>> = BinaryHeap::new();
    let mut results: BinaryHeap<Candidate> = BinaryHeap::new();

    for node in start_nodes {
        node.ensure_dimension(target.len())?;
        if !visited.insert(node.reference().clone()) {
            continue;
        }
        let candidate = Candidate::new(target, node);
        candidates.push(Reverse(candidate.clone()));
        results.push(candidate);
    }
    if results.is_empty() {
        return Err(Error::InvalidArgument(
            "layer search needs at least one start node".to_string(),
        ));
    }
    // Duplicate-free seeding can still overshoot ef.
    while results.len() > ef {
        results.pop();
    }

    while let Some(Reverse(current)) = candidates.pop() {
        if results.len() >= ef
            && results
                .peek()
                .is_some_and(|farthest| current.squared_distance() > farthest.squared_distance())
        {
            break;
        }

        for neighbor in store.get_neighbors(layer, current.reference())? {
            if visited.contains(&neighbor) {
                continue;
            }
            visited.insert(neighbor.clone());

            let vector = store.fetch_vector(&neighbor)?;
            vector.ensure_dimension(target.len())?;
            let candidate = Candidate::new(target, vector);

            if results.len() < ef {
                candidates.push(Reverse(candidate.clone()));
                results.push(candidate);
            } else if results
                .peek()
                .is_some_and(|farthest| candidate.squared_distance() < farthest.squared_distance())
            {
                results.pop();
                candidates.push(Reverse(candidate.clone()));
                results.push(candidate);
            }
        }
    }

    tracing::trace!(
        layer,
        ef,
        visited = visited.len(),
        found = results.len(),
        "layer search finished"
    );

    Ok(results.into_sorted_vec())
}
