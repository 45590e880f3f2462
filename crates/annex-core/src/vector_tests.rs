//! Tests for `vector` module

use super::error::Error;
use super::vector::*;
use proptest::prelude::*;
use std::collections::HashSet;

// -------------------------------------------------------------------------
// VectorRef
// -------------------------------------------------------------------------

#[test]
fn test_position_ref_is_big_endian() {
    let reference = VectorRef::from_position(0x0102);
    assert_eq!(reference.as_bytes(), &[0, 0, 0, 0, 0, 0, 1, 2]);
    assert_eq!(reference.len(), 8);
    assert_eq!(reference.position(), Some(0x0102));
}

#[test]
fn test_position_refs_sort_by_position() {
    let mut refs: Vec<VectorRef> = [300u64, 2, 256, 1].map(VectorRef::from_position).to_vec();
    refs.sort();
    let positions: Vec<u64> = refs.iter().filter_map(VectorRef::position).collect();
    assert_eq!(positions, vec![1, 2, 256, 300]);
}

#[test]
fn test_position_of_non_positional_ref() {
    assert_eq!(VectorRef::new(vec![1, 2, 3]).position(), None);
}

#[test]
fn test_ref_display_and_debug() {
    let reference = VectorRef::new(vec![0x00, 0xff, 0x10]);
    assert_eq!(reference.to_string(), "0x00ff10");
    assert_eq!(format!("{reference:?}"), "VectorRef(0x00ff10)");
}

#[test]
fn test_ref_equality_is_bytewise() {
    let a = VectorRef::from(&[1u8, 2, 3][..]);
    let b = VectorRef::from(vec![1u8, 2, 3]);
    let c = VectorRef::from(vec![1u8, 2, 4]);

    let mut set = HashSet::new();
    set.insert(a.clone());

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert!(set.contains(&b));
    assert!(set.contains(&[1u8, 2, 3][..]));
}

#[test]
fn test_default_ref_is_empty() {
    assert!(VectorRef::default().is_empty());
}

// -------------------------------------------------------------------------
// Embedding codec
// -------------------------------------------------------------------------

#[test]
fn test_decode_embedding_native_order() {
    // Arrange
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&1.5f32.to_ne_bytes());
    bytes.extend_from_slice(&(-2.0f32).to_ne_bytes());

    // Act
    let values = decode_embedding(&bytes).expect("decode");

    // Assert
    assert_eq!(values, vec![1.5, -2.0]);
}

#[test]
fn test_decode_empty_embedding_fails() {
    assert!(matches!(
        decode_embedding(&[]),
        Err(Error::InvalidEmbedding(_))
    ));
}

#[test]
fn test_decode_unaligned_embedding_fails() {
    for len in [1usize, 2, 3, 5, 7, 9] {
        let bytes = vec![0u8; len];
        assert!(
            matches!(decode_embedding(&bytes), Err(Error::InvalidEmbedding(_))),
            "length {len} should be rejected"
        );
    }
}

#[test]
fn test_encode_embedding_layout() {
    let bytes = encode_embedding(&[1.0, 2.0, 3.0]);
    assert_eq!(bytes.len(), 12);
    assert_eq!(&bytes[4..8], &2.0f32.to_ne_bytes());
}

// -------------------------------------------------------------------------
// Vector
// -------------------------------------------------------------------------

#[test]
fn test_vector_from_bytes() {
    // Arrange
    let reference = VectorRef::from_position(9);
    let bytes = encode_embedding(&[3.0, 4.0]);

    // Act
    let vector = Vector::from_bytes(reference.clone(), &bytes).expect("decode");

    // Assert
    assert_eq!(vector.reference(), &reference);
    assert_eq!(vector.embedding(), &[3.0, 4.0]);
    assert_eq!(vector.dimension(), 2);
    assert!((vector.distance_to(&[0.0, 0.0]) - 5.0).abs() < 1e-6);
}

#[test]
fn test_vector_clone_shares_embedding() {
    let vector = Vector::new(VectorRef::from_position(1), vec![1.0, 2.0]);
    let copy = vector.clone();
    assert_eq!(vector, copy);
    assert!(std::ptr::eq(vector.embedding(), copy.embedding()));
}

#[test]
fn test_ensure_dimension() {
    let vector = Vector::new(VectorRef::from_position(1), vec![1.0, 2.0, 3.0]);
    assert!(vector.ensure_dimension(3).is_ok());
    assert!(matches!(
        vector.ensure_dimension(4),
        Err(Error::DimensionMismatch {
            expected: 4,
            actual: 3
        })
    ));
}

proptest! {
    #[test]
    fn prop_embedding_bytes_preserve_values(values in prop::collection::vec(any::<f32>().prop_filter("finite", |v| v.is_finite()), 1..64)) {
        let decoded = decode_embedding(&encode_embedding(&values)).expect("decode");
        prop_assert_eq!(decoded, values);
    }
}
