//! Tests for `search` module - bounded beam search within one layer.

use super::search::search_layer;
use super::test_support::line_store;
use crate::error::Error;
use crate::storage::{GraphStore, MemoryStore};
use crate::vector::{encode_embedding, Vector};

fn positions(found: &[super::Candidate]) -> Vec<u64> {
    found
        .iter()
        .filter_map(|c| c.reference().position())
        .collect()
}

#[test]
fn test_walks_chain_to_target() {
    // Arrange
    let (store, refs) = line_store(10);
    let start = store.fetch_vector(&refs[0]).expect("vector");

    // Act
    let found = search_layer(&store, &[7.0, 0.0], [start], 3, 0).expect("search");

    // Assert
    assert_eq!(positions(&found), vec![7, 6, 8]);
}

#[test]
fn test_results_ascending_and_bounded() {
    let (store, refs) = line_store(20);
    let start = store.fetch_vector(&refs[19]).expect("vector");

    let found = search_layer(&store, &[4.2, 0.0], [start], 5, 0).expect("search");

    assert_eq!(found.len(), 5);
    assert!(found
        .windows(2)
        .all(|w| w[0].squared_distance() <= w[1].squared_distance()));
    assert_eq!(found[0].reference(), &refs[4]);
}

#[test]
fn test_ef_larger_than_graph_returns_everything_reachable() {
    let (store, refs) = line_store(6);
    let start = store.fetch_vector(&refs[2]).expect("vector");

    let found = search_layer(&store, &[0.0, 0.0], [start], 50, 0).expect("search");

    assert_eq!(positions(&found), vec![0, 1, 2, 3, 4, 5]);
}

#[test]
fn test_only_reachable_nodes_are_returned() {
    // Arrange: an isolated node sitting right on the target
    let (mut store, refs) = line_store(5);
    let island = store
        .insert_row(encode_embedding(&[10.0, 0.0]), None)
        .expect("row");
    store.put_neighbors(0, &island, &[]).expect("put");
    let start = store.fetch_vector(&refs[0]).expect("vector");

    // Act
    let found = search_layer(&store, &[10.0, 0.0], [start], 10, 0).expect("search");

    // Assert
    assert!(found.iter().all(|c| c.reference() != &island));
    assert_eq!(found[0].reference(), &refs[4]);
}

#[test]
fn test_duplicate_start_nodes_are_merged() {
    let (store, refs) = line_store(3);
    let start = store.fetch_vector(&refs[1]).expect("vector");

    let found = search_layer(&store, &[1.0, 0.0], [start.clone(), start], 10, 0).expect("search");

    assert_eq!(positions(&found), vec![1, 0, 2]);
}

#[test]
fn test_more_start_nodes_than_ef() {
    let (store, refs) = line_store(6);
    let starts: Vec<Vector> = refs
        .iter()
        .map(|r| store.fetch_vector(r).expect("vector"))
        .collect();

    let found = search_layer(&store, &[5.0, 0.0], starts, 2, 0).expect("search");

    assert_eq!(positions(&found), vec![5, 4]);
}

#[test]
fn test_searches_requested_layer_only() {
    // Arrange: layer 1 links 0 -> 3 directly
    let (mut store, refs) = line_store(4);
    store.put_neighbors(1, &refs[0], &[refs[3].clone()]).expect("put");
    store.put_neighbors(1, &refs[3], &[refs[0].clone()]).expect("put");
    let start = store.fetch_vector(&refs[0]).expect("vector");

    // Act
    let found = search_layer(&store, &[2.0, 0.0], [start], 4, 1).expect("search");

    // Assert
    assert_eq!(positions(&found), vec![3, 0]);
}

#[test]
fn test_ef_zero_is_rejected() {
    let (store, refs) = line_store(2);
    let start = store.fetch_vector(&refs[0]).expect("vector");
    assert!(matches!(
        search_layer(&store, &[0.0, 0.0], [start], 0, 0),
        Err(Error::InvalidArgument(_))
    ));
}

#[test]
fn test_no_start_nodes_is_rejected() {
    let (store, _) = line_store(2);
    assert!(matches!(
        search_layer(&store, &[0.0, 0.0], Vec::new(), 4, 0),
        Err(Error::InvalidArgument(_))
    ));
}

#[test]
fn test_missing_record_propagates() {
    let (store, refs) = line_store(3);
    let start = store.fetch_vector(&refs[0]).expect("vector");
    assert!(matches!(
        search_layer(&store, &[0.0, 0.0], [start], 4, 2),
        Err(Error::NeighborsNotFound { layer: 2, .. })
    ));
}

#[test]
fn test_dangling_neighbor_propagates_row_not_found() {
    // Arrange
    let (mut store, refs) = line_store(3);
    store.remove_row(&refs[1]);
    let start = store.fetch_vector(&refs[0]).expect("vector");

    // Act
    let result = search_layer(&store, &[0.0, 0.0], [start], 4, 0);

    // Assert
    assert!(matches!(result, Err(Error::RowNotFound(r)) if r == refs[1]));
}

#[test]
fn test_dimension_mismatch() {
    let (store, refs) = line_store(2);
    let start = store.fetch_vector(&refs[0]).expect("vector");
    assert!(matches!(
        search_layer(&store, &[0.0, 0.0, 0.0], [start], 4, 0),
        Err(Error::DimensionMismatch {
            expected: 3,
            actual: 2
        })
    ));
}

#[test]
fn test_generic_over_unsized_store() {
    let (store, refs) = line_store(3);
    let dyn_store: &dyn GraphStore = &store;
    let start = store.fetch_vector(&refs[0]).expect("vector");

    let found = search_layer(dyn_store, &[2.0, 0.0], [start], 1, 0).expect("search");

    assert_eq!(found[0].reference(), &refs[2]);
}

#[test]
fn test_start_node_without_record_fails() {
    let mut store = MemoryStore::new();
    let reference = store
        .insert_row(encode_embedding(&[1.0]), None)
        .expect("row");
    let start = Vector::new(reference, vec![1.0]);
    assert!(matches!(
        search_layer(&store, &[0.0], [start], 1, 0),
        Err(Error::NeighborsNotFound { .. })
    ));
}
