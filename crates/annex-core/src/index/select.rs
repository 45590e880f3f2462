//! Nearest-k neighbor selection.
//!
//! Plain distance ranking: no diversity check between the selected
//! neighbors, so clustered data can leave a node linked only inside its
//! cluster.

use super::candidate::Candidate;
use crate::vector::Vector;
use std::collections::BinaryHeap;

/// Returns the `min(k, n)` candidates nearest to `target`, nearest first.
///
/// # Panics
///
/// Panics if a candidate's dimension differs from `target`'s.
#[must_use]
pub fn select_neighbors(
    target: &[f32],
    candidates: impl IntoIterator<Item = Vector>,
    k: usize,
) -> Vec<Candidate> {
    select_nearest(
        candidates
            .into_iter()
            .map(|vector| Candidate::new(target, vector)),
        k,
    )
}

/// Keeps the `k` smallest already-scored candidates, ascending.
///
/// A max-heap capped at `k` evicts the current farthest whenever it overflows.
pub(crate) fn select_nearest(candidates: impl IntoIterator<Item = Candidate>, k: usize) -> Vec<Candidate> {
    if k == 0 {
        return Vec::new();
    }

    // Never holds more than k entries; k itself may be huge.
    let mut best: BinaryHeap<Candidate> = BinaryHeap::new();
    for candidate in candidates {
        if best.len() < k {
            best.push(candidate);
        } else if best.peek().is_some_and(|farthest| candidate < *farthest) {
            best.pop();
            best.push(candidate);
        }
    }

    best.into_sorted_vec()
}
