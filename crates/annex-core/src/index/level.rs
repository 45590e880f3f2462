//! Top-layer sampling for new nodes.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use std::fmt;

/// Sampled levels are clamped to this value.
pub const MAX_LEVEL: usize = 64;

/// Draws each new node's top layer from a geometric distribution.
///
/// `level = floor(-ln(U) * normalization_factor)` with `U ~ Uniform(0, 1]`.
/// The random source is owned by the sampler and can be injected, so a
/// session can bring its own generator or a fixed seed for reproducible builds.
pub struct LevelSampler {
    rng: Box<dyn RngCore + Send + Sync>,
    normalization_factor: f64,
}

impl LevelSampler {
    /// Sampler backed by an OS-seeded `StdRng`.
    #[must_use]
    pub fn new(normalization_factor: f64) -> Self {
        Self::with_rng(normalization_factor, StdRng::from_entropy())
    }

    /// Deterministic sampler for reproducible graphs.
    #[must_use]
    pub fn with_seed(normalization_factor: f64, seed: u64) -> Self {
        Self::with_rng(normalization_factor, StdRng::seed_from_u64(seed))
    }

    /// Sampler driven by a caller-supplied generator.
    #[must_use]
    pub fn with_rng(normalization_factor: f64, rng: impl RngCore + Send + Sync + 'static) -> Self {
        Self {
            rng: Box::new(rng),
            normalization_factor,
        }
    }

    /// Level multiplier in use.
    #[must_use]
    pub fn normalization_factor(&self) -> f64 {
        self.normalization_factor
    }

    /// Draws the next top layer.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn sample(&mut self) -> usize {
        // gen() yields [0, 1); flip it so ln never sees 0.
        let uniform = 1.0 - self.rng.gen::<f64>();
        let level = (-uniform.ln() * self.normalization_factor).floor();
        if level >= MAX_LEVEL as f64 {
            MAX_LEVEL
        } else {
            level as usize
        }
    }
}

impl fmt::Debug for LevelSampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LevelSampler")
            .field("normalization_factor", &self.normalization_factor)
            .finish_non_exhaustive()
    }
}
