//! Tests for `distance` module

use super::distance::*;
use proptest::prelude::*;

fn naive_squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

#[test]
fn test_euclidean_3_4_5() {
    assert!((euclidean(&[0.0, 0.0], &[3.0, 4.0]) - 5.0).abs() < 1e-6);
}

#[test]
fn test_squared_l2_identical_is_zero() {
    let v: Vec<f32> = (0..37).map(|i| i as f32 * 0.25).collect();
    assert_eq!(squared_l2(&v, &v), 0.0);
}

#[test]
fn test_squared_l2_simd_and_tail_lanes() {
    // 19 = two full f32x8 lanes + 3 tail elements
    let a: Vec<f32> = (0..19).map(|i| i as f32).collect();
    let b: Vec<f32> = (0..19).map(|i| (i as f32) + 1.0).collect();

    let result = squared_l2(&a, &b);

    assert!((result - 19.0).abs() < 1e-4);
}

#[test]
fn test_single_dimension() {
    assert!((euclidean(&[-2.0], &[1.0]) - 3.0).abs() < 1e-6);
}

#[test]
#[should_panic(expected = "Vector dimensions must match")]
fn test_dimension_mismatch_panics() {
    let _ = squared_l2(&[1.0, 2.0], &[1.0]);
}

proptest! {
    #[test]
    fn prop_matches_naive(
        pair in (1usize..64).prop_flat_map(|n| (
            prop::collection::vec(-100.0f32..100.0, n),
            prop::collection::vec(-100.0f32..100.0, n),
        ))
    ) {
        let (a, b) = pair;
        let expected = naive_squared_l2(&a, &b);
        let actual = squared_l2(&a, &b);
        prop_assert!((expected - actual).abs() <= expected.abs() * 1e-4 + 1e-3);
    }

    #[test]
    fn prop_symmetric_and_non_negative(
        pair in (1usize..32).prop_flat_map(|n| (
            prop::collection::vec(-10.0f32..10.0, n),
            prop::collection::vec(-10.0f32..10.0, n),
        ))
    ) {
        let (a, b) = pair;
        let ab = euclidean(&a, &b);
        let ba = euclidean(&b, &a);
        prop_assert!(ab >= 0.0);
        prop_assert!((ab - ba).abs() < 1e-4);
    }
}
