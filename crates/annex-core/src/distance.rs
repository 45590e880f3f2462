//! Euclidean (L2) distance.
//!
//! Graph traversal only ranks candidates, so the hot path compares squared
//! distances and takes the square root only when a distance is reported.
//!
//! # Performance
//!
//! The squared difference accumulation uses explicit `wide::f32x8` lanes with a
//! scalar tail. `wide` picks AVX2/SSE/NEON/SIMD128 for the target at compile
//! time and falls back to scalar code elsewhere.

use wide::f32x8;

/// Computes the squared Euclidean distance.
///
/// # Panics
///
/// Panics if vectors have different lengths.
#[inline]
#[must_use]
pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(a.len(), b.len(), "Vector dimensions must match");

    let simd_len = a.len() / 8;
    let mut sum = f32x8::ZERO;

    for i in 0..simd_len {
        let offset = i * 8;
        let va = f32x8::from(&a[offset..offset + 8]);
        let vb = f32x8::from(&b[offset..offset + 8]);
        let diff = va - vb;
        sum = diff.mul_add(diff, sum);
    }

    let mut result = sum.reduce_add();
    for i in simd_len * 8..a.len() {
        let diff = a[i] - b[i];
        result += diff * diff;
    }

    result
}

/// Computes the Euclidean distance `sqrt(sum((a_i - b_i)^2))`.
///
/// # Panics
///
/// Panics if vectors have different lengths.
#[inline]
#[must_use]
pub fn euclidean(a: &[f32], b: &[f32]) -> f32 {
    squared_l2(a, b).sqrt()
}
