//! Synthetic NPK/IMG files for integration tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use dfolib::img::{self, COMPRESSION_NONE, FORMAT_LINK};
use dfolib::npk::{self, NAME_KEY, NAME_LENGTH};
use sha2::{Digest, Sha256};

/// One frame of a synthetic sheet
pub enum Frame {
    Encoded {
        format: u32,
        compression: u32,
        width: u32,
        height: u32,
        data: Vec<u8>,
    },
    Link(u32),
}

impl Frame {
    pub fn raw(format: u32, width: u32, height: u32, data: &[u8]) -> Self {
        Frame::Encoded {
            format,
            compression: COMPRESSION_NONE,
            width,
            height,
            data: data.to_vec(),
        }
    }
}

/// Serialize a version 2 IMG sheet
pub fn img_bytes(frames: &[Frame]) -> Vec<u8> {
    let mut directory = Vec::new();
    let mut blobs = Vec::new();

    for frame in frames {
        match frame {
            Frame::Link(target) => {
                directory.extend_from_slice(&FORMAT_LINK.to_le_bytes());
                directory.extend_from_slice(&target.to_le_bytes());
            }
            Frame::Encoded {
                format,
                compression,
                width,
                height,
                data,
            } => {
                for field in [*format, *compression, *width, *height, data.len() as u32] {
                    directory.extend_from_slice(&field.to_le_bytes());
                }
                for field in [0i32, 0, *width as i32, *height as i32] {
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
    out.extend_from_slice(&(frames.len() as u32).to_le_bytes());
    out.extend_from_slice(&directory);
    out.extend_from_slice(&blobs);
    out
}

/// A table row; `None` data means "point at offset/size, write nothing"
pub struct Row<'a> {
    pub name: &'a str,
    pub data: Option<&'a [u8]>,
    pub offset: u32,
    pub size: u32,
}

impl<'a> Row<'a> {
    pub fn data(name: &'a str, data: &'a [u8]) -> Self {
        Self {
            name,
            data: Some(data),
            offset: 0,
            size: 0,
        }
    }

    pub fn fixed(name: &'a str, offset: u32, size: u32) -> Self {
        Self {
            name,
            data: None,
            offset,
            size,
        }
    }
}

/// Serialize an NPK with a valid checksum
pub fn npk_bytes(rows: &[Row<'_>]) -> Vec<u8> {
    let table_end = npk::HEADER_SIZE + rows.len() * npk::ENTRY_SIZE + npk::CHECKSUM_SIZE;

    let mut out = Vec::new();
    out.extend_from_slice(&npk::MAGIC);
    out.extend_from_slice(&(rows.len() as u32).to_le_bytes());

    let mut blobs = Vec::new();
    for row in rows {
        let (offset, size) = match row.data {
            Some(bytes) => {
                let offset = table_end + blobs.len();
                blobs.extend_from_slice(bytes);
                (offset as u32, bytes.len() as u32)
            }
            None => (row.offset, row.size),
        };
        out.extend_from_slice(&offset.to_le_bytes());
        out.extend_from_slice(&size.to_le_bytes());

        let mut field = [0u8; NAME_LENGTH];
        field[..row.name.len()].copy_from_slice(row.name.as_bytes());
        for (b, k) in field.iter_mut().zip(NAME_KEY.iter()) {
            *b ^= k;
        }
        out.extend_from_slice(&field);
    }

    let covered = npk::checksum_coverage(rows.len());
    let checksum = Sha256::digest(&out[..covered]);
    out.extend_from_slice(&checksum);
    out.extend_from_slice(&blobs);
    out
}

/// Write an NPK into `dir` and return its path
pub fn write_npk(dir: &Path, file_name: &str, rows: &[Row<'_>]) -> PathBuf {
    let path = dir.join(file_name);
    std::fs::write(&path, npk_bytes(rows)).unwrap();
    path
}
