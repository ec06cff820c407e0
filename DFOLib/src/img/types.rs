//! Types for IMG frame handling

use serde::Serialize;

use super::{
    COMPRESSION_NONE, COMPRESSION_RLE_BYTE, COMPRESSION_RLE_PIXEL, COMPRESSION_ZLIB, FORMAT_ARGB1555,
    FORMAT_ARGB4444, FORMAT_ARGB8888, FORMAT_LINK,
};

/// Stored pixel layout of a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Argb1555,
    Argb4444,
    Argb8888,
    /// Tag not understood; frames with it fail to decode
    Unknown(u32),
}

impl PixelFormat {
    /// Parse from a header tag. The link tag is handled by the directory parser.
    #[must_use]
    pub fn from_tag(tag: u32) -> Self {
        match tag {
            FORMAT_ARGB1555 => PixelFormat::Argb1555,
            FORMAT_ARGB4444 => PixelFormat::Argb4444,
            FORMAT_ARGB8888 => PixelFormat::Argb8888,
            other => PixelFormat::Unknown(other),
        }
    }

    #[must_use]
    pub fn tag(self) -> u32 {
        match self {
            PixelFormat::Argb1555 => FORMAT_ARGB1555,
            PixelFormat::Argb4444 => FORMAT_ARGB4444,
            PixelFormat::Argb8888 => FORMAT_ARGB8888,
            PixelFormat::Unknown(tag) => tag,
        }
    }

    /// Bytes per stored pixel, `None` for unknown formats
    #[must_use]
    pub fn bytes_per_pixel(self) -> Option<usize> {
        match self {
            PixelFormat::Argb1555 | PixelFormat::Argb4444 => Some(2),
            PixelFormat::Argb8888 => Some(4),
            PixelFormat::Unknown(_) => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            PixelFormat::Argb1555 => "argb1555",
            PixelFormat::Argb4444 => "argb4444",
            PixelFormat::Argb8888 => "argb8888",
            PixelFormat::Unknown(_) => "unknown",
        }
    }
}

/// Compression applied to a frame's data block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Zlib,
    /// Run-length stream counted in bytes
    RleByte,
    /// Run-length stream counted in whole pixels
    RlePixel,
    Unknown(u32),
}

impl Compression {
    #[must_use]
    pub fn from_tag(tag: u32) -> Self {
        match tag {
            COMPRESSION_NONE => Compression::None,
            COMPRESSION_ZLIB => Compression::Zlib,
            COMPRESSION_RLE_BYTE => Compression::RleByte,
            COMPRESSION_RLE_PIXEL => Compression::RlePixel,
            other => Compression::Unknown(other),
        }
    }

    #[must_use]
    pub fn tag(self) -> u32 {
        match self {
            Compression::None => COMPRESSION_NONE,
            Compression::Zlib => COMPRESSION_ZLIB,
            Compression::RleByte => COMPRESSION_RLE_BYTE,
            Compression::RlePixel => COMPRESSION_RLE_PIXEL,
            Compression::Unknown(tag) => tag,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Compression::None => "none",
            Compression::Zlib => "zlib",
            Compression::RleByte => "rle-byte",
            Compression::RlePixel => "rle-pixel",
            Compression::Unknown(_) => "unknown",
        }
    }
}

/// How a frame's pixels are obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameMode {
    /// Reuses the pixels of another (non-link) frame
    Link { target: usize },
    /// Has its own data block
    Encoded {
        format: PixelFormat,
        compression: Compression,
    },
}

/// One entry of the frame directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameHeader {
    pub index: usize,
    pub mode: FrameMode,
    pub width: u32,
    pub height: u32,
    /// Offset of the data block within the IMG
    pub data_offset: usize,
    /// Length of the data block (0 for links)
    pub data_length: usize,
    /// Placement of the frame relative to the sprite origin
    pub key_x: i32,
    pub key_y: i32,
    /// Canvas size the frame is placed on
    pub max_width: u32,
    pub max_height: u32,
}

impl FrameHeader {
    #[must_use]
    pub fn is_link(&self) -> bool {
        matches!(self.mode, FrameMode::Link { .. })
    }

    #[must_use]
    pub fn link_target(&self) -> Option<usize> {
        match self.mode {
            FrameMode::Link { target } => Some(target),
            FrameMode::Encoded { .. } => None,
        }
    }
}

/// Listing row for a frame, as shown to a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameMetadata {
    pub index: usize,
    /// For link frames, the dimensions of the target
    pub width: u32,
    pub height: u32,
    pub key_x: i32,
    pub key_y: i32,
    pub max_width: u32,
    pub max_height: u32,
    pub format: String,
    pub compression: String,
    pub link_target: Option<usize>,
    pub data_length: usize,
}

/// An RGBA8 image decoded from one frame
///
/// Immutable once produced; safe to share across threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFrame {
    index: usize,
    resolved_from: Option<usize>,
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl DecodedFrame {
    pub(crate) fn new(index: usize, resolved_from: Option<usize>, width: u32, height: u32, rgba: Vec<u8>) -> Self {
        debug_assert_eq!(rgba.len(), width as usize * height as usize * 4);
        Self {
            index,
            resolved_from,
            width,
            height,
            rgba,
        }
    }

    /// The frame index that was requested
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// For link frames, the frame the pixels came from
    #[must_use]
    pub fn resolved_from(&self) -> Option<usize> {
        self.resolved_from
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major RGBA8 pixels
    #[must_use]
    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    /// Copy into an `image` buffer.
    #[must_use]
    pub fn to_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.rgba.clone())
    }
}
