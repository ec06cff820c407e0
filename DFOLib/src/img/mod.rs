//! IMG ("Neople Img File", version 2) sprite sheets
//!
//! Layout, all integers little-endian:
//!
//! ```text
//! 0x00  [u8; 16]  magic "Neople Img File\0"
//! 0x10  u32       directory size in bytes
//! 0x14  u32       reserved
//! 0x18  u32       version (2)
//! 0x1C  u32       frame count
//! 0x20  headers   frame directory
//! ....  blocks    frame data, contiguous, in frame order
//! ```
//!
//! A frame header starts with a pixel format tag. Link frames (`0x11`) carry
//! only a target index; every other frame carries compression, dimensions,
//! data length and placement fields (36 bytes in total).

mod decode;
mod directory;
mod pixel;
mod rle;
mod types;

pub use directory::ImgFile;
pub use types::{Compression, DecodedFrame, FrameHeader, FrameMetadata, FrameMode, PixelFormat};

/// IMG magic bytes
pub const MAGIC: [u8; 16] = *b"Neople Img File\0";

/// Only directory version handled
pub const SUPPORTED_VERSION: u32 = 2;

/// Size of the fixed file header, where the directory starts
pub const HEADER_SIZE: usize = 32;

// Pixel format tags
pub const FORMAT_ARGB1555: u32 = 0x0E;
pub const FORMAT_ARGB4444: u32 = 0x0F;
pub const FORMAT_ARGB8888: u32 = 0x10;
pub const FORMAT_LINK: u32 = 0x11;

// Compression tags
pub const COMPRESSION_NONE: u32 = 0x05;
pub const COMPRESSION_ZLIB: u32 = 0x06;
pub const COMPRESSION_RLE_BYTE: u32 = 0x07;
pub const COMPRESSION_RLE_PIXEL: u32 = 0x08;
