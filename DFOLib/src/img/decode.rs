//! Per-frame pixel decoding

use std::borrow::Cow;

use super::types::{Compression, FrameHeader, FrameMode};
use super::{pixel, rle};
use crate::compression::inflate_zlib;
use crate::error::{Error, Result};

/// Decode a non-link frame's data block to RGBA8.
///
/// Encoding tags are checked before any data byte is read.
pub(super) fn decode_pixels(header: &FrameHeader, file_data: &[u8]) -> Result<Vec<u8>> {
    let frame = header.index;
    let offset = header.data_offset;

    let (format, compression) = match header.mode {
        FrameMode::Encoded { format, compression } => (format, compression),
        FrameMode::Link { target } => {
            return Err(Error::BrokenLink {
                frame,
                target,
                reason: "link frames have no data of their own",
            });
        }
    };

    let unsupported = || Error::UnsupportedEncoding {
        frame,
        format_tag: format.tag(),
        compression_tag: compression.tag(),
    };
    let bpp = format.bytes_per_pixel().ok_or_else(unsupported)?;
    if let Compression::Unknown(_) = compression {
        return Err(unsupported());
    }

    let corrupt = |reason: String| Error::CorruptFrame {
        frame,
        offset: offset as u64,
        reason,
    };

    let (width, height) = (header.width as usize, header.height as usize);
    if width == 0 || height == 0 {
        return Err(corrupt(format!("zero-sized frame ({width}x{height})")));
    }
    let expected = width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(bpp))
        .ok_or_else(|| corrupt(format!("{width}x{height} frame is too large")))?;

    let block = offset
        .checked_add(header.data_length)
        .and_then(|end| file_data.get(offset..end))
        .ok_or_else(|| corrupt("data block runs past end of file".to_string()))?;

    let stored: Cow<'_, [u8]> = match compression {
        Compression::None => Cow::Borrowed(block),
        Compression::Zlib => {
            let inflated = inflate_zlib(block, expected).map_err(|e| corrupt(e.to_string()))?;
            Cow::Owned(inflated)
        }
        Compression::RleByte => Cow::Owned(rle::decode_runs(block, 1, expected, frame, offset)?),
        Compression::RlePixel => Cow::Owned(rle::decode_runs(block, bpp, expected, frame, offset)?),
        Compression::Unknown(_) => unreachable!("rejected above"),
    };

    if stored.len() != expected {
        return Err(corrupt(format!(
            "{} data expands to {} bytes, expected {expected}",
            compression.as_str(),
            stored.len()
        )));
    }

    pixel::expand_to_rgba(&stored, format, width, height, frame, offset)
}
