//! Row references and embeddings.
//!
//! A [`VectorRef`] is the opaque byte key the row store hands out for a row; it
//! doubles as the node identity in the graph. A [`Vector`] pairs that key with
//! the row's embedding.
//!
//! Both types are immutable and share their buffers through `Arc`, so moving a
//! vector from a search frontier into a result set (or from one layer's search
//! into the next) never needs a deep copy and can never dangle.

use crate::distance;
use crate::error::{Error, Result};
use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

const F32_SIZE: usize = std::mem::size_of::<f32>();

/// Opaque fixed-length row reference.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct VectorRef(Arc<[u8]>);

impl VectorRef {
    /// Wraps raw reference bytes.
    #[must_use]
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self(bytes.into())
    }

    /// Builds the 8-byte big-endian reference for a row position.
    ///
    /// Big-endian keeps byte order equal to position order.
    #[must_use]
    pub fn from_position(position: u64) -> Self {
        Self::new(position.to_be_bytes().to_vec())
    }

    /// Decodes a reference produced by [`VectorRef::from_position`].
    #[must_use]
    pub fn position(&self) -> Option<u64> {
        let bytes: [u8; 8] = self.0.as_ref().try_into().ok()?;
        Some(u64::from_be_bytes(bytes))
    }

    /// Returns the raw bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the reference length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true for a zero-length reference.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Borrow<[u8]> for VectorRef {
    fn borrow(&self) -> &[u8] {
        &self.0
    }
}

impl From<&[u8]> for VectorRef {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes)
    }
}

impl From<Vec<u8>> for VectorRef {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl fmt::Display for VectorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("0x")?;
        for byte in self.0.iter() {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for VectorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VectorRef({self})")
    }
}

/// A row reference plus its embedding.
#[derive(Clone, PartialEq)]
pub struct Vector {
    reference: VectorRef,
    embedding: Arc<[f32]>,
}

impl Vector {
    /// Creates a vector from an already decoded embedding.
    #[must_use]
    pub fn new(reference: VectorRef, embedding: impl Into<Arc<[f32]>>) -> Self {
        Self {
            reference,
            embedding: embedding.into(),
        }
    }

    /// Decodes an embedding column value and attaches it to `reference`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEmbedding`] if the byte length is zero or not a
    /// multiple of 4.
    pub fn from_bytes(reference: VectorRef, bytes: &[u8]) -> Result<Self> {
        Ok(Self::new(reference, decode_embedding(bytes)?))
    }

    /// Row reference of this vector.
    #[must_use]
    pub fn reference(&self) -> &VectorRef {
        &self.reference
    }

    /// Embedding values.
    #[must_use]
    pub fn embedding(&self) -> &[f32] {
        &self.embedding
    }

    /// Number of dimensions.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.embedding.len()
    }

    /// Euclidean distance to another embedding.
    ///
    /// # Panics
    ///
    /// Panics if the dimensions differ.
    #[must_use]
    pub fn distance_to(&self, other: &[f32]) -> f32 {
        distance::euclidean(&self.embedding, other)
    }

    /// Fails with [`Error::DimensionMismatch`] unless this vector has `expected` dimensions.
    pub(crate) fn ensure_dimension(&self, expected: usize) -> Result<()> {
        if self.dimension() == expected {
            Ok(())
        } else {
            Err(Error::DimensionMismatch {
                expected,
                actual: self.dimension(),
            })
        }
    }
}

impl fmt::Debug for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vector")
            .field("reference", &self.reference)
            .field("dimension", &self.dimension())
            .finish()
    }
}

/// Decodes a flat sequence of native-order 4-byte floats.
///
/// # Errors
///
/// Returns [`Error::InvalidEmbedding`] if `bytes` is empty or its length is not
/// a multiple of 4.
pub fn decode_embedding(bytes: &[u8]) -> Result<Vec<f32>> {
    if bytes.is_empty() {
        return Err(Error::InvalidEmbedding("embedding is empty".to_string()));
    }
    if bytes.len() % F32_SIZE != 0 {
        return Err(Error::InvalidEmbedding(format!(
            "byte length {} is not a multiple of {F32_SIZE}",
            bytes.len()
        )));
    }

    Ok(bytes
        .chunks_exact(F32_SIZE)
        .map(|chunk| f32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}

/// Encodes an embedding into its column representation.
#[must_use]
pub fn encode_embedding(embedding: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(embedding.len() * F32_SIZE);
    for value in embedding {
        bytes.extend_from_slice(&value.to_ne_bytes());
    }
    bytes
}
