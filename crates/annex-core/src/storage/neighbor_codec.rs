//! Neighbor-list blob encoding.
//!
//! ```text
//! [count: u16 LE][ref_0 .. ref_{count-1}]   (each ref is ref_length bytes)
//! ```
//!
//! The blob is exactly `2 + count * ref_length` bytes.

use crate::error::{Error, Result};
use crate::index::HNSW_MAX_M;
use crate::vector::VectorRef;

const COUNT_SIZE: usize = std::mem::size_of::<u16>();

/// Returns the encoded size of a list of `count` references.
#[must_use]
pub const fn encoded_len(count: usize, ref_length: usize) -> usize {
    COUNT_SIZE + count * ref_length
}

/// Encodes a neighbor list.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if the list holds more than
/// [`HNSW_MAX_M`] entries or a reference is not `ref_length` bytes long.
pub fn encode_neighbors(neighbors: &[VectorRef], ref_length: usize) -> Result<Vec<u8>> {
    if neighbors.len() > HNSW_MAX_M {
        return Err(Error::InvalidArgument(format!(
            "neighbor list of {} entries exceeds the maximum of {HNSW_MAX_M}",
            neighbors.len()
        )));
    }
    let count = u16::try_from(neighbors.len()).map_err(|_| {
        Error::InvalidArgument(format!(
            "{} neighbors overflow the count header",
            neighbors.len()
        ))
    })?;

    let mut blob = Vec::with_capacity(encoded_len(neighbors.len(), ref_length));
    blob.extend_from_slice(&count.to_le_bytes());
    for neighbor in neighbors {
        if neighbor.len() != ref_length {
            return Err(Error::InvalidArgument(format!(
                "reference {neighbor} is {} bytes, expected {ref_length}",
                neighbor.len()
            )));
        }
        blob.extend_from_slice(neighbor.as_bytes());
    }
    Ok(blob)
}

/// Decodes a neighbor list written by [`encode_neighbors`].
///
/// # Errors
///
/// Returns [`Error::Corruption`] if the blob is truncated, the declared count
/// disagrees with the payload length, or the count is out of range.
pub fn decode_neighbors(blob: &[u8], ref_length: usize) -> Result<Vec<VectorRef>> {
    if ref_length == 0 {
        return Err(Error::InvalidArgument(
            "reference length must be non-zero".to_string(),
        ));
    }
    if blob.len() < COUNT_SIZE {
        return Err(Error::Corruption(format!(
            "neighbor list of {} bytes has no count header",
            blob.len()
        )));
    }

    let count = usize::from(u16::from_le_bytes([blob[0], blob[1]]));
    let payload = &blob[COUNT_SIZE..];

    if count > HNSW_MAX_M {
        return Err(Error::Corruption(format!(
            "neighbor count {count} exceeds the maximum of {HNSW_MAX_M}"
        )));
    }
    if payload.len() % ref_length != 0 || payload.len() / ref_length != count {
        return Err(Error::Corruption(format!(
            "neighbor count {count} does not match {} payload bytes of {ref_length}-byte references",
            payload.len()
        )));
    }

    Ok(payload.chunks_exact(ref_length).map(VectorRef::from).collect())
}
