//! Run-length decoding for RLE-byte and RLE-pixel frames
//!
//! A stream is a sequence of units, each starting with a control byte:
//!
//! - `1nnnnnnn`: repeat run, the next element is repeated `n` times
//! - `0nnnnnnn`: literal run, the next `n` elements are copied verbatim
//!
//! An element is one byte for RLE-byte frames and one stored pixel for
//! RLE-pixel frames. A count of zero is invalid.

use crate::error::{Error, Result};
use crate::utils::ByteCursor;

const REPEAT_FLAG: u8 = 0x80;
const COUNT_MASK: u8 = 0x7F;

/// Expand `stream` into exactly `expected` bytes.
///
/// `unit` is the element size in bytes; `frame` and `base_offset` (the
/// stream's offset inside the IMG) only feed error context.
pub(super) fn decode_runs(
    stream: &[u8],
    unit: usize,
    expected: usize,
    frame: usize,
    base_offset: usize,
) -> Result<Vec<u8>> {
    let corrupt = |at: usize, reason: String| Error::CorruptFrame {
        frame,
        offset: (base_offset + at) as u64,
        reason,
    };

    // Each run is at least two bytes and yields at most 127 elements
    let max_output = stream.len().saturating_mul(usize::from(COUNT_MASK) * unit);
    if expected > max_output {
        return Err(corrupt(
            0,
            format!("{} byte run-length stream cannot fill {expected} bytes", stream.len()),
        ));
    }

    let mut out = Vec::with_capacity(expected);
    let mut cursor = ByteCursor::new(stream);

    while out.len() < expected {
        let at = cursor.position();
        let control = cursor.read_u8().map_err(|_| {
            corrupt(at, format!("run-length stream ended after {} of {expected} bytes", out.len()))
        })?;

        let count = usize::from(control & COUNT_MASK);
        if count == 0 {
            return Err(corrupt(at, "zero-length run".to_string()));
        }

        let run_len = count * unit;
        if out.len() + run_len > expected {
            return Err(corrupt(
                at,
                format!(
                    "run of {run_len} bytes overruns frame ({} of {expected} bytes already written)",
                    out.len()
                ),
            ));
        }

        if control & REPEAT_FLAG != 0 {
            let value = cursor
                .read_bytes(unit)
                .map_err(|_| corrupt(at, "repeat run reads past end of frame data".to_string()))?;
            for _ in 0..count {
                out.extend_from_slice(value);
            }
        } else {
            let literal = cursor
                .read_bytes(run_len)
                .map_err(|_| corrupt(at, "literal run reads past end of frame data".to_string()))?;
            out.extend_from_slice(literal);
        }
    }

    if cursor.remaining() > 0 {
        tracing::debug!(
            "Frame {}: ignoring {} trailing bytes after run-length stream",
            frame,
            cursor.remaining()
        );
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::testing::{rle_literals, rle_repeat};

    #[test]
    fn test_byte_runs() {
        let mut stream = rle_repeat(&[0xAA], 3);
        stream.extend(rle_literals(&[1, 2, 3], 1));

        let out = decode_runs(&stream, 1, 6, 0, 0).unwrap();
        assert_eq!(out, vec![0xAA, 0xAA, 0xAA, 1, 2, 3]);
    }

    #[test]
    fn test_pixel_runs() {
        let mut stream = rle_repeat(&[1, 2], 2);
        stream.extend(rle_literals(&[9, 8, 7, 6], 2));

        let out = decode_runs(&stream, 2, 8, 0, 0).unwrap();
        assert_eq!(out, vec![1, 2, 1, 2, 9, 8, 7, 6]);
    }

    #[test]
    fn test_short_stream() {
        let stream = rle_repeat(&[5], 4);
        let err = decode_runs(&stream, 1, 5, 2, 100).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CorruptFrame);
        assert!(matches!(err, Error::CorruptFrame { frame: 2, offset: 102, .. }));
    }

    #[test]
    fn test_overrun() {
        let stream = rle_repeat(&[5], 6);
        let err = decode_runs(&stream, 1, 5, 0, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CorruptFrame);
    }

    #[test]
    fn test_zero_counts() {
        assert!(decode_runs(&[0x00, 1], 1, 1, 0, 0).is_err());
        assert!(decode_runs(&[0x80, 1], 1, 1, 0, 0).is_err());
    }

    #[test]
    fn test_runs_past_data() {
        // Literal of 4 with only 2 bytes behind it
        assert!(decode_runs(&[0x04, 1, 2], 1, 4, 0, 0).is_err());
        // Repeat with no value byte
        assert!(decode_runs(&[0x84], 1, 4, 0, 0).is_err());
    }

    #[test]
    fn test_declared_size_beyond_stream() {
        let err = decode_runs(&[0x81, 0], 1, usize::MAX / 2, 4, 32).unwrap_err();
        assert!(matches!(err, Error::CorruptFrame { frame: 4, offset: 32, .. }));

        let stream = rle_repeat(&[0, 0], 127);
        assert_eq!(decode_runs(&stream, 2, 254, 0, 0).unwrap().len(), 254);
        // Three bytes can never yield more than 3 * 127 pixels
        let err = decode_runs(&stream, 2, 3 * 127 * 2 + 2, 0, 0).unwrap_err();
        assert!(err.to_string().contains("cannot fill"));
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let mut stream = rle_repeat(&[7], 2);
        stream.extend_from_slice(&[0xFF, 0xFF]);
        assert_eq!(decode_runs(&stream, 1, 2, 0, 0).unwrap(), vec![7, 7]);
    }
}
