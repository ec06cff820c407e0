//! Builders for synthetic NPK and IMG buffers used by unit tests

use sha2::{Digest, Sha256};

use crate::img::{self, COMPRESSION_NONE, FORMAT_LINK};
use crate::npk::{self, ENTRY_SIZE, HEADER_SIZE, NAME_KEY, NAME_LENGTH};

enum NpkData {
    Bytes(Vec<u8>),
    Fixed { offset: u32, size: u32 },
}

pub(crate) struct NpkBuilder {
    entries: Vec<(String, NpkData)>,
}

impl NpkBuilder {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Entry whose data is appended after the table.
    pub fn entry(mut self, name: &str, data: &[u8]) -> Self {
        self.entries.push((name.to_string(), NpkData::Bytes(data.to_vec())));
        self
    }

    /// Entry with an explicit offset and size and no data written.
    pub fn raw_entry(mut self, name: &str, offset: u32, size: u32) -> Self {
        self.entries.push((name.to_string(), NpkData::Fixed { offset, size }));
        self
    }

    pub fn build(self) -> Vec<u8> {
        let count = self.entries.len();
        let table_end = HEADER_SIZE + count * ENTRY_SIZE + npk::CHECKSUM_SIZE;

        let mut out = Vec::new();
        out.extend_from_slice(&npk::MAGIC);
        out.extend_from_slice(&(count as u32).to_le_bytes());

        let mut blobs = Vec::new();
        let mut next_offset = table_end;
        for (name, data) in &self.entries {
            let (offset, size) = match data {
                NpkData::Bytes(bytes) => {
                    let offset = next_offset;
                    next_offset += bytes.len();
                    blobs.extend_from_slice(bytes);
                    (offset as u32, bytes.len() as u32)
                }
                NpkData::Fixed { offset, size } => (*offset, *size),
            };
            out.extend_from_slice(&offset.to_le_bytes());
            out.extend_from_slice(&size.to_le_bytes());
            out.extend_from_slice(&encrypt_name(name));
        }

        let covered = npk::checksum_coverage(count);
        let checksum = Sha256::digest(&out[..covered]);
        out.extend_from_slice(&checksum);
        out.extend_from_slice(&blobs);
        out
    }
}

pub(crate) fn encrypt_name(name: &str) -> [u8; NAME_LENGTH] {
    let mut field = [0u8; NAME_LENGTH];
    field[..name.len()].copy_from_slice(name.as_bytes());
    for (b, k) in field.iter_mut().zip(NAME_KEY.iter()) {
        *b ^= k;
    }
    field
}

enum FrameSpec {
    Encoded {
        format: u32,
        compression: u32,
        width: u32,
        height: u32,
        data: Vec<u8>,
    },
    Link(u32),
}

pub(crate) struct ImgBuilder {
    frames: Vec<FrameSpec>,
}

impl ImgBuilder {
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    pub fn raw(self, format: u32, width: u32, height: u32, data: &[u8]) -> Self {
        self.encoded(format, COMPRESSION_NONE, width, height, data)
    }

    pub fn encoded(mut self, format: u32, compression: u32, width: u32, height: u32, data: &[u8]) -> Self {
        self.frames.push(FrameSpec::Encoded {
            format,
            compression,
            width,
            height,
            data: data.to_vec(),
        });
        self
    }

    pub fn link(mut self, target: u32) -> Self {
        self.frames.push(FrameSpec::Link(target));
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut directory = Vec::new();
        let mut blobs = Vec::new();

        for frame in &self.frames {
            match frame {
                FrameSpec::Link(target) => {
                    directory.extend_from_slice(&FORMAT_LINK.to_le_bytes());
                    directory.extend_from_slice(&target.to_le_bytes());
                }
                FrameSpec::Encoded {
                    format,
                    compression,
                    width,
                    height,
                    data,
                } => {
                    for field in [*format, *compression, *width, *height, data.len() as u32] {
                        directory.extend_from_slice(&field.to_le_bytes());
                    }
                    // key_x, key_y, max_width, max_height
                    for field in [3i32, -4, *width as i32, *height as i32] {
                        directory.extend_from_slice(&field.to_le_bytes());
                    }
                    blobs.extend_from_slice(data);
                }
            }
        }

        let mut out = Vec::new();
        out.extend_from_slice(&img::MAGIC);
        out.extend_from_slice(&(directory.len() as u32).to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&img::SUPPORTED_VERSION.to_le_bytes());
        out.extend_from_slice(&(self.frames.len() as u32).to_le_bytes());
        out.extend_from_slice(&directory);
        out.extend_from_slice(&blobs);
        out
    }
}

/// Encode `data` as literal runs only, in `unit`-byte elements.
pub(crate) fn rle_literals(data: &[u8], unit: usize) -> Vec<u8> {
    let mut out = Vec::new();
    for chunk in data.chunks(127 * unit) {
        out.push((chunk.len() / unit) as u8);
        out.extend_from_slice(chunk);
    }
    out
}

/// A single repeat run of `count` copies of `value`.
pub(crate) fn rle_repeat(value: &[u8], count: u8) -> Vec<u8> {
    assert!(count > 0 && count < 0x80);
    let mut out = vec![0x80 | count];
    out.extend_from_slice(value);
    out
}
