//! Fuzz target for the neighbor-list decoder.
//!
//! Graph records are read back from storage that may have been truncated or
//! overwritten. Decoding any byte string must either yield a list whose
//! re-encoding is byte-identical, or fail with a corruption error; it must
//! never panic or over-allocate from the declared count.

#![no_main]

use annex_core::storage::neighbor_codec::{decode_neighbors, encode_neighbors};
use annex_core::ErrorKind;
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    ref_length: u8,
    blob: Vec<u8>,
}

fuzz_target!(|input: Input| {
    let ref_length = usize::from(input.ref_length);

    match decode_neighbors(&input.blob, ref_length) {
        Ok(neighbors) => {
            let encoded = encode_neighbors(&neighbors, ref_length).expect("decoded list re-encodes");
            assert_eq!(encoded, input.blob);
        }
        Err(err) if ref_length == 0 => assert_eq!(err.kind(), ErrorKind::InvalidArgument),
        Err(err) => assert_eq!(err.kind(), ErrorKind::Corruption),
    }
});
