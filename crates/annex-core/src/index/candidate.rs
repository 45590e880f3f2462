//! Distance-ordered search candidate.

use crate::distance;
use crate::vector::{Vector, VectorRef};
use std::cmp::Ordering;

/// A vector tagged with its squared distance to the current search target.
///
/// Ordering follows `f32::total_cmp` on the distance, then the reference
/// bytes, so `Ord`/`Eq` stay consistent inside `BinaryHeap` even for NaN or
/// equidistant candidates.
#[derive(Debug, Clone)]
pub struct Candidate {
    squared_distance: f32,
    vector: Vector,
}

impl Candidate {
    /// Scores `vector` against `target`.
    ///
    /// # Panics
    ///
    /// Panics if the dimensions differ.
    #[must_use]
    pub fn new(target: &[f32], vector: Vector) -> Self {
        Self {
            squared_distance: distance::squared_l2(target, vector.embedding()),
            vector,
        }
    }

    /// Euclidean distance to the target.
    #[must_use]
    pub fn distance(&self) -> f32 {
        self.squared_distance.sqrt()
    }

    /// Squared Euclidean distance to the target.
    #[must_use]
    pub fn squared_distance(&self) -> f32 {
        self.squared_distance
    }

    /// The candidate vector.
    #[must_use]
    pub fn vector(&self) -> &Vector {
        &self.vector
    }

    /// Shorthand for `self.vector().reference()`.
    #[must_use]
    pub fn reference(&self) -> &VectorRef {
        self.vector.reference()
    }

    /// Drops the score.
    #[must_use]
    pub fn into_vector(self) -> Vector {
        self.vector
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.squared_distance
            .total_cmp(&other.squared_distance)
            .then_with(|| self.vector.reference().cmp(other.vector.reference()))
    }
}
