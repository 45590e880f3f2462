//! Fuzz target for graph construction.
//!
//! Builds a small index from arbitrary embeddings (including NaN and
//! infinities) and checks the per-layer neighbor caps after every insert.

#![no_main]

use annex_core::{
    encode_embedding, GraphStore, HnswIndex, HnswParams, LevelSampler, MemoryStore,
};
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

/// Upper bound on nodes per run, keeps iterations fast.
const MAX_POINTS: usize = 64;

#[derive(Debug, Arbitrary)]
struct Input {
    seed: u64,
    max_connections: u8,
    max_insert_connections: u8,
    dimension: u8,
    values: Vec<f32>,
}

fuzz_target!(|input: Input| {
    let dimension = usize::from(input.dimension % 8) + 1;
    let params = HnswParams {
        max_connections: usize::from(input.max_connections % 8) + 1,
        max_insert_connections: usize::from(input.max_insert_connections % 16) + 1,
        ef_construction: 16,
        ..HnswParams::default()
    };
    let sampler = LevelSampler::with_seed(params.normalization_factor, input.seed);
    let Ok(mut index) = HnswIndex::with_sampler(MemoryStore::new(), params, sampler) else {
        return;
    };

    for point in input.values.chunks_exact(dimension).take(MAX_POINTS) {
        let bytes = encode_embedding(point);
        let Ok(reference) = index.store_mut().insert_row(bytes.clone(), None) else {
            return;
        };
        index.insert(&reference, &bytes).expect("insert into a consistent graph");
    }

    let store = index.store();
    for (layer, node) in store.record_keys() {
        let neighbors = store.get_neighbors(layer, node).expect("records stay decodable");
        assert!(neighbors.len() <= params.max_neighbors(layer));
    }

    if let Some(query) = input.values.get(..dimension) {
        let _ = index.first(query, 5);
    }
});
