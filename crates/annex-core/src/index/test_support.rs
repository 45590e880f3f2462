//! Fixtures shared by the index tests.

use super::{HnswIndex, HnswParams, LevelSampler};
use crate::storage::{GraphStore, MemoryStore};
use crate::vector::{encode_embedding, VectorRef};
use rand::rngs::mock::StepRng;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Index whose level sampler is seeded.
pub(crate) fn seeded_index(params: HnswParams, seed: u64) -> HnswIndex<MemoryStore> {
    let sampler = LevelSampler::with_seed(params.normalization_factor, seed);
    HnswIndex::with_sampler(MemoryStore::new(), params, sampler).expect("valid params")
}

/// Index that puts every node on layer 0 only.
pub(crate) fn flat_index(params: HnswParams) -> HnswIndex<MemoryStore> {
    // An all-zero stream gives U = 1, hence level 0.
    let sampler = LevelSampler::with_rng(params.normalization_factor, StepRng::new(0, 0));
    HnswIndex::with_sampler(MemoryStore::new(), params, sampler).expect("valid params")
}

/// Appends a row and indexes it.
pub(crate) fn add(index: &mut HnswIndex<MemoryStore>, embedding: &[f32]) -> VectorRef {
    let bytes = encode_embedding(embedding);
    let reference = index
        .store_mut()
        .insert_row(bytes.clone(), None)
        .expect("insert row");
    index.insert(&reference, &bytes).expect("index row");
    reference
}

/// Store holding `n` points on the x axis, chained `i <-> i + 1` on layer 0.
pub(crate) fn line_store(n: u64) -> (MemoryStore, Vec<VectorRef>) {
    let mut store = MemoryStore::new();
    let refs: Vec<VectorRef> = (0..n)
        .map(|i| {
            store
                .insert_row(encode_embedding(&[i as f32, 0.0]), None)
                .expect("insert row")
        })
        .collect();

    for (i, reference) in refs.iter().enumerate() {
        let mut neighbors = Vec::new();
        if i > 0 {
            neighbors.push(refs[i - 1].clone());
        }
        if i + 1 < refs.len() {
            neighbors.push(refs[i + 1].clone());
        }
        store.put_neighbors(0, reference, &neighbors).expect("put");
    }
    (store, refs)
}

/// Uniform points in `[0, 1)^dim`.
pub(crate) fn random_points(count: usize, dim: usize, seed: u64) -> Vec<Vec<f32>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| (0..dim).map(|_| rng.gen::<f32>()).collect())
        .collect()
}

/// Indices of the `k` points nearest to `query`, by brute force.
pub(crate) fn brute_force(points: &[Vec<f32>], query: &[f32], k: usize) -> Vec<usize> {
    let mut scored: Vec<(usize, f32)> = points
        .iter()
        .enumerate()
        .map(|(i, p)| (i, crate::distance::squared_l2(p, query)))
        .collect();
    scored.sort_by(|a, b| a.1.total_cmp(&b.1));
    scored.into_iter().take(k).map(|(i, _)| i).collect()
}
