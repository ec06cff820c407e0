//! Stored pixel formats to RGBA8

use super::types::PixelFormat;
use crate::error::{Error, Result};

/// RGBA8 output buffer that only accepts writes inside its bounds.
pub(super) struct Canvas {
    width: usize,
    height: usize,
    rgba: Vec<u8>,
}

impl Canvas {
    pub(super) fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            rgba: vec![0; width * height * 4],
        }
    }

    /// Store one pixel, refusing coordinates outside the frame.
    pub(super) fn put(&mut self, x: usize, y: usize, pixel: [u8; 4]) -> std::result::Result<(), (usize, usize)> {
        if x >= self.width || y >= self.height {
            return Err((x, y));
        }
        let at = (y * self.width + x) * 4;
        self.rgba[at..at + 4].copy_from_slice(&pixel);
        Ok(())
    }

    pub(super) fn into_rgba(self) -> Vec<u8> {
        self.rgba
    }
}

/// Convert `stored` (exactly `width * height` pixels in `format`) to RGBA8.
pub(super) fn expand_to_rgba(
    stored: &[u8],
    format: PixelFormat,
    width: usize,
    height: usize,
    frame: usize,
    offset: usize,
) -> Result<Vec<u8>> {
    let corrupt = |reason: String| Error::CorruptFrame {
        frame,
        offset: offset as u64,
        reason,
    };

    let bpp = format.bytes_per_pixel().ok_or(Error::UnsupportedEncoding {
        frame,
        format_tag: format.tag(),
        compression_tag: 0,
    })?;

    if stored.len() != width * height * bpp {
        return Err(corrupt(format!(
            "pixel data is {} bytes, {width}x{height} {} needs {}",
            stored.len(),
            format.as_str(),
            width * height * bpp
        )));
    }

    let mut canvas = Canvas::new(width, height);
    for (i, px) in stored.chunks_exact(bpp).enumerate() {
        let rgba = match format {
            PixelFormat::Argb8888 => bgra_to_rgba(px),
            PixelFormat::Argb4444 => argb4444_to_rgba(u16::from_le_bytes([px[0], px[1]])),
            PixelFormat::Argb1555 => argb1555_to_rgba(u16::from_le_bytes([px[0], px[1]])),
            PixelFormat::Unknown(_) => unreachable!("rejected above"),
        };
        canvas
            .put(i % width, i / width, rgba)
            .map_err(|(x, y)| corrupt(format!("pixel ({x}, {y}) outside {width}x{height}")))?;
    }

    Ok(canvas.into_rgba())
}

/// ARGB8888 is stored little-endian, i.e. bytes B, G, R, A.
fn bgra_to_rgba(px: &[u8]) -> [u8; 4] {
    [px[2], px[1], px[0], px[3]]
}

fn argb4444_to_rgba(v: u16) -> [u8; 4] {
    let nibble = |shift: u16| ((v >> shift) & 0x0F) as u8 * 17;
    [nibble(8), nibble(4), nibble(0), nibble(12)]
}

fn argb1555_to_rgba(v: u16) -> [u8; 4] {
    let five = |shift: u16| {
        let c = ((v >> shift) & 0x1F) as u8;
        (c << 3) | (c >> 2)
    };
    let a = if v & 0x8000 != 0 { 0xFF } else { 0x00 };
    [five(10), five(5), five(0), a]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bgra() {
        assert_eq!(bgra_to_rgba(&[1, 2, 3, 4]), [3, 2, 1, 4]);
    }

    #[test]
    fn test_argb4444() {
        assert_eq!(argb4444_to_rgba(0xF000), [0, 0, 0, 255]);
        assert_eq!(argb4444_to_rgba(0x8F00), [255, 0, 0, 136]);
        assert_eq!(argb4444_to_rgba(0x00F1), [0, 255, 17, 0]);
    }

    #[test]
    fn test_argb1555() {
        assert_eq!(argb1555_to_rgba(0xFFFF), [255, 255, 255, 255]);
        assert_eq!(argb1555_to_rgba(0x7C00), [255, 0, 0, 0]);
        assert_eq!(argb1555_to_rgba(0x83E0), [0, 255, 0, 255]);
        assert_eq!(argb1555_to_rgba(0x0001), [0, 0, 8, 0]);
    }

    #[test]
    fn test_canvas_rejects_outside_writes() {
        let mut canvas = Canvas::new(2, 2);
        assert!(canvas.put(1, 1, [1; 4]).is_ok());
        assert_eq!(canvas.put(2, 0, [1; 4]), Err((2, 0)));
        assert_eq!(canvas.put(0, 2, [1; 4]), Err((0, 2)));
    }

    #[test]
    fn test_expand_length_mismatch() {
        let err = expand_to_rgba(&[0; 7], PixelFormat::Argb8888, 1, 2, 4, 0).unwrap_err();
        assert!(matches!(err, Error::CorruptFrame { frame: 4, .. }));
    }
}
