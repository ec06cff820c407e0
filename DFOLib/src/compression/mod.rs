//! Compression utilities

use std::io::Read;

use flate2::read::ZlibDecoder;

use crate::error::{Error, Result};

/// Largest buffer reserved before any data has been inflated
const INITIAL_CAPACITY_LIMIT: usize = 1 << 20;

/// Inflate a zlib stream that should expand to `expected_len` bytes.
///
/// Output is capped at `expected_len + 1` bytes, so a stream that expands
/// past its declared size is caught without inflating all of it. The caller
/// decides what a length mismatch means. `expected_len` comes from untrusted
/// headers, so it only bounds the output and never sizes an allocation up
/// front.
///
/// # Errors
/// Returns [`Error::ZlibDecompressionFailed`] if the stream is malformed.
pub fn inflate_zlib(compressed: &[u8], expected_len: usize) -> Result<Vec<u8>> {
    let limit = (expected_len as u64).saturating_add(1);
    let mut decoder = ZlibDecoder::new(compressed).take(limit);
    let mut decompressed = Vec::with_capacity(expected_len.min(INITIAL_CAPACITY_LIMIT));

    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| Error::ZlibDecompressionFailed {
            message: e.to_string(),
        })?;

    Ok(decompressed)
}
