//! IMG header and frame directory parsing

use super::types::{Compression, DecodedFrame, FrameHeader, FrameMetadata, FrameMode, PixelFormat};
use super::{FORMAT_LINK, HEADER_SIZE, MAGIC, SUPPORTED_VERSION, decode};
use crate::error::{Error, Result};
use crate::utils::ByteCursor;

/// Smallest possible frame header (a link)
const MIN_FRAME_HEADER: usize = 8;

/// A parsed IMG sprite sheet.
///
/// Owns its bytes; the directory is immutable after parsing, so frames can be
/// decoded from several threads at once.
#[derive(Debug)]
pub struct ImgFile {
    name: String,
    version: u32,
    frames: Vec<FrameHeader>,
    data: Vec<u8>,
}

impl ImgFile {
    /// Parse the IMG header and frame directory.
    ///
    /// Errors carry the entry `name` as context.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] for a bad magic, an unsupported
    /// version, or a directory size that does not match the headers.
    /// Returns [`Error::BrokenLink`] if a link frame points out of range or
    /// at another link.
    /// Returns [`Error::TruncatedData`] if the headers or the declared data
    /// blocks run past the end of the file.
    pub fn parse(name: impl Into<String>, data: Vec<u8>) -> Result<Self> {
        let name = name.into();
        match parse_directory(&data) {
            Ok((version, frames)) => {
                tracing::debug!("Parsed {}: {} frames (v{})", name, frames.len(), version);
                Ok(Self {
                    name,
                    version,
                    frames,
                    data,
                })
            }
            Err(e) => Err(e.in_entry(name)),
        }
    }

    /// Archive entry name this sheet was read from
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn version(&self) -> u32 {
        self.version
    }

    #[must_use]
    pub fn frames(&self) -> &[FrameHeader] {
        &self.frames
    }

    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Header of one frame.
    ///
    /// # Errors
    /// Returns [`Error::OutOfRange`] if `index` is not a frame of this sheet.
    pub fn frame(&self, index: usize) -> Result<&FrameHeader> {
        self.frames.get(index).ok_or_else(|| {
            Error::OutOfRange {
                what: "frame",
                index: index as u64,
                limit: self.frames.len() as u64,
            }
            .in_entry(&self.name)
        })
    }

    /// Listing rows for every frame. Link frames report their target's size.
    #[must_use]
    pub fn metadata(&self) -> Vec<FrameMetadata> {
        self.frames
            .iter()
            .map(|header| {
                let (source, link_target) = match header.mode {
                    // Targets are validated during parsing
                    FrameMode::Link { target } => (&self.frames[target], Some(target)),
                    FrameMode::Encoded { .. } => (header, None),
                };
                let (format, compression) = match source.mode {
                    FrameMode::Encoded { format, compression } => (format, compression),
                    FrameMode::Link { .. } => (PixelFormat::Unknown(FORMAT_LINK), Compression::None),
                };

                FrameMetadata {
                    index: header.index,
                    width: source.width,
                    height: source.height,
                    key_x: source.key_x,
                    key_y: source.key_y,
                    max_width: source.max_width,
                    max_height: source.max_height,
                    format: format.as_str().to_string(),
                    compression: compression.as_str().to_string(),
                    link_target,
                    data_length: header.data_length,
                }
            })
            .collect()
    }

    /// Decode one frame to RGBA, following a link if the frame is one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] for a bad index,
    /// [`Error::UnsupportedEncoding`] for unknown format or compression tags,
    /// and [`Error::CorruptFrame`] for malformed data. Errors carry the entry
    /// name as context.
    pub fn decode_frame(&self, index: usize) -> Result<DecodedFrame> {
        let header = self.frame(index)?;

        let (source, resolved_from) = match header.mode {
            FrameMode::Link { target } => {
                let target_header = self.frame(target)?;
                if target_header.is_link() {
                    return Err(Error::BrokenLink {
                        frame: index,
                        target,
                        reason: "target is itself a link",
                    }
                    .in_entry(&self.name));
                }
                (target_header, Some(target))
            }
            FrameMode::Encoded { .. } => (header, None),
        };

        let rgba = decode::decode_pixels(source, &self.data).map_err(|e| e.in_entry(&self.name))?;
        Ok(DecodedFrame::new(index, resolved_from, source.width, source.height, rgba))
    }
}

fn invalid(offset: usize, reason: String) -> Error {
    Error::InvalidFormat {
        what: "IMG header",
        offset: offset as u64,
        reason,
    }
}

fn parse_directory(data: &[u8]) -> Result<(u32, Vec<FrameHeader>)> {
    let mut cursor = ByteCursor::new(data);

    let magic = cursor
        .read_array::<16>()
        .map_err(|_| invalid(0, format!("file is {} bytes, too short for magic", data.len())))?;
    if magic != MAGIC {
        return Err(invalid(0, "missing Neople Img File magic".to_string()));
    }

    let directory_size = cursor.read_u32()? as usize;
    let _reserved = cursor.read_u32()?;
    let version = cursor.read_u32()?;
    if version != SUPPORTED_VERSION {
        return Err(invalid(
            24,
            format!("unsupported IMG version {version} (supported: {SUPPORTED_VERSION})"),
        ));
    }

    let count = cursor.read_u32()? as usize;
    // Refuse counts the buffer cannot possibly hold before allocating for them
    if count.saturating_mul(MIN_FRAME_HEADER) > cursor.remaining() {
        return Err(Error::TruncatedData {
            offset: HEADER_SIZE as u64,
            needed: (count as u64).saturating_mul(MIN_FRAME_HEADER as u64),
            available: cursor.remaining() as u64,
        });
    }

    let mut frames = Vec::with_capacity(count);
    for index in 0..count {
        frames.push(read_frame_header(&mut cursor, index)?);
    }

    let consumed = cursor.position() - HEADER_SIZE;
    if consumed != directory_size {
        return Err(invalid(
            16,
            format!("directory size is {directory_size} bytes but {count} headers span {consumed}"),
        ));
    }

    assign_data_offsets(&mut frames, cursor.position(), data.len())?;
    validate_links(&frames)?;

    Ok((version, frames))
}

fn read_frame_header(cursor: &mut ByteCursor<'_>, index: usize) -> Result<FrameHeader> {
    let format_tag = cursor.read_u32()?;

    if format_tag == FORMAT_LINK {
        let target = cursor.read_u32()? as usize;
        return Ok(FrameHeader {
            index,
            mode: FrameMode::Link { target },
            width: 0,
            height: 0,
            data_offset: 0,
            data_length: 0,
            key_x: 0,
            key_y: 0,
            max_width: 0,
            max_height: 0,
        });
    }

    let compression_tag = cursor.read_u32()?;
    let width = cursor.read_u32()?;
    let height = cursor.read_u32()?;
    let data_length = cursor.read_u32()? as usize;
    let key_x = cursor.read_i32()?;
    let key_y = cursor.read_i32()?;
    let max_width = cursor.read_u32()?;
    let max_height = cursor.read_u32()?;

    Ok(FrameHeader {
        index,
        mode: FrameMode::Encoded {
            format: PixelFormat::from_tag(format_tag),
            compression: Compression::from_tag(compression_tag),
        },
        width,
        height,
        data_offset: 0,
        data_length,
        key_x,
        key_y,
        max_width,
        max_height,
    })
}

/// Lay data blocks out back to back from `data_start`, in frame order.
fn assign_data_offsets(frames: &mut [FrameHeader], data_start: usize, file_len: usize) -> Result<()> {
    let mut offset = data_start;
    for frame in frames.iter_mut().filter(|f| !f.is_link()) {
        frame.data_offset = offset;
        offset = offset.saturating_add(frame.data_length);
    }

    if offset > file_len {
        return Err(Error::TruncatedData {
            offset: data_start as u64,
            needed: (offset - data_start) as u64,
            available: (file_len - data_start) as u64,
        });
    }
    Ok(())
}

fn validate_links(frames: &[FrameHeader]) -> Result<()> {
    for frame in frames {
        let Some(target) = frame.link_target() else {
            continue;
        };

        let reason = match frames.get(target) {
            None => "target out of range",
            Some(_) if target == frame.index => "links to itself",
            Some(t) if t.is_link() => "target is itself a link",
            Some(_) => continue,
        };
        return Err(Error::BrokenLink {
            frame: frame.index,
            target,
            reason,
        });
    }
    Ok(())
}
