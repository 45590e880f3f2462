//! Error types for `annex`.
//!
//! A single error enum covers every index operation. Each variant carries a
//! stable code (`ANNEX-XXX`) so that the embedding engine can surface it as an
//! index-operation failure on the enclosing statement.

use crate::vector::VectorRef;
use thiserror::Error;

/// Result type alias for `annex` operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed embedding bytes.
    Format,
    /// Missing graph record or unresolvable row reference.
    NotFound,
    /// Persisted graph data that cannot be trusted.
    Corruption,
    /// Failure reported by the row store or the graph store.
    Store,
    /// Caller passed an argument the operation cannot work with.
    InvalidArgument,
    /// Invalid configuration.
    Config,
}

/// Errors that can occur in `annex` operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Embedding byte length is zero or not a multiple of 4 (ANNEX-001).
    #[error("[ANNEX-001] Invalid embedding: {0}")]
    InvalidEmbedding(String),

    /// No neighbor record for `(layer, node)` (ANNEX-002).
    #[error("[ANNEX-002] No neighbor list for node {node} at layer {layer}")]
    NeighborsNotFound {
        /// Layer that was probed.
        layer: usize,
        /// Node whose record is missing.
        node: VectorRef,
    },

    /// Row store cannot resolve a reference (ANNEX-003).
    #[error("[ANNEX-003] Row {0} not found")]
    RowNotFound(VectorRef),

    /// Neighbor list does not decode consistently (ANNEX-004).
    #[error("[ANNEX-004] Index corrupted: {0}")]
    Corruption(String),

    /// Two vectors of one index disagree on dimension (ANNEX-005).
    #[error("[ANNEX-005] Vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimension of the vector driving the operation.
        expected: usize,
        /// Dimension found in the store.
        actual: usize,
    },

    /// Invalid argument (ANNEX-006).
    #[error("[ANNEX-006] Invalid argument: {0}")]
    InvalidArgument(String),

    /// Storage error (ANNEX-007).
    #[error("[ANNEX-007] Storage error: {0}")]
    Storage(String),

    /// Configuration error (ANNEX-008).
    #[error("[ANNEX-008] Configuration error: {0}")]
    Config(String),

    /// IO error (ANNEX-009).
    #[error("[ANNEX-009] IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns the error code (e.g., "ANNEX-001").
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidEmbedding(_) => "ANNEX-001",
            Self::NeighborsNotFound { .. } => "ANNEX-002",
            Self::RowNotFound(_) => "ANNEX-003",
            Self::Corruption(_) => "ANNEX-004",
            Self::DimensionMismatch { .. } => "ANNEX-005",
            Self::InvalidArgument(_) => "ANNEX-006",
            Self::Storage(_) => "ANNEX-007",
            Self::Config(_) => "ANNEX-008",
            Self::Io(_) => "ANNEX-009",
        }
    }

    /// Returns the coarse error class.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidEmbedding(_) => ErrorKind::Format,
            Self::NeighborsNotFound { .. } | Self::RowNotFound(_) => ErrorKind::NotFound,
            Self::Corruption(_) | Self::DimensionMismatch { .. } => ErrorKind::Corruption,
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::Storage(_) | Self::Io(_) => ErrorKind::Store,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// Returns true if this error is recoverable.
    ///
    /// Corruption-class errors mean the graph must be rebuilt.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self.kind(), ErrorKind::Corruption)
    }
}

impl From<crate::config::ConfigError> for Error {
    fn from(err: crate::config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
