//! Tests for `select` module

use super::candidate::Candidate;
use super::select::{select_nearest, select_neighbors};
use crate::vector::{Vector, VectorRef};
use proptest::prelude::*;

fn points(xs: &[f32]) -> Vec<Vector> {
    xs.iter()
        .enumerate()
        .map(|(i, &x)| Vector::new(VectorRef::from_position(i as u64), vec![x]))
        .collect()
}

fn positions(selected: &[Candidate]) -> Vec<u64> {
    selected
        .iter()
        .filter_map(|c| c.reference().position())
        .collect()
}

#[test]
fn test_selects_k_nearest_ascending() {
    // Arrange
    let candidates = points(&[9.0, 1.0, 5.0, 3.0, 7.0]);

    // Act
    let selected = select_neighbors(&[0.0], candidates, 3);

    // Assert
    assert_eq!(positions(&selected), vec![1, 3, 2]);
}

#[test]
fn test_fewer_candidates_than_k() {
    let selected = select_neighbors(&[0.0], points(&[2.0, 1.0]), 10);
    assert_eq!(positions(&selected), vec![1, 0]);
}

#[test]
fn test_k_zero_selects_nothing() {
    assert!(select_neighbors(&[0.0], points(&[1.0, 2.0]), 0).is_empty());
}

#[test]
fn test_empty_candidates() {
    assert!(select_neighbors(&[0.0], Vec::new(), 5).is_empty());
}

#[test]
fn test_no_diversity_check() {
    // A tight cluster beats a lone point in another direction.
    let candidates = points(&[1.0, 1.01, 1.02, -1.5]);
    let selected = select_neighbors(&[0.0], candidates, 3);
    assert_eq!(positions(&selected), vec![0, 1, 2]);
}

#[test]
fn test_select_nearest_on_scored_candidates() {
    let scored: Vec<Candidate> = points(&[4.0, 2.0, 6.0])
        .into_iter()
        .map(|v| Candidate::new(&[0.0], v))
        .collect();
    let selected = select_nearest(scored, 2);
    assert_eq!(positions(&selected), vec![1, 0]);
}

proptest! {
    #[test]
    fn prop_matches_full_sort(xs in prop::collection::vec(-1_000.0f32..1_000.0, 0..64), k in 0usize..20) {
        let selected = select_neighbors(&[0.0], points(&xs), k);

        let mut expected: Vec<Candidate> = points(&xs)
            .into_iter()
            .map(|v| Candidate::new(&[0.0], v))
            .collect();
        expected.sort();
        expected.truncate(k);

        prop_assert_eq!(positions(&selected), positions(&expected));
    }
}

#[test]
fn test_huge_k_returns_every_candidate() {
    let selected = select_neighbors(&[0.0], points(&[2.0, 1.0]), usize::MAX / 2);
    assert_eq!(positions(&selected), vec![1, 0]);

    let selected = select_neighbors(&[0.0], points(&[3.0]), usize::MAX);
    assert_eq!(positions(&selected), vec![0]);
}
