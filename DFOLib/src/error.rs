//! Error types for `DFOLib`

use std::path::PathBuf;

use thiserror::Error;

/// The error type for `DFOLib` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// IO error tied to a specific path.
    #[error("IO error on {}: {source}", path.display())]
    IoAt {
        /// The file or folder being accessed.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    // ==================== Structure Errors ====================
    /// Bad magic, unsupported version, or inconsistent structure.
    #[error("invalid {what} at offset {offset:#x}: {reason}")]
    InvalidFormat {
        /// The structure being parsed (e.g. "NPK header").
        what: &'static str,
        /// Byte offset where the problem was detected.
        offset: u64,
        /// Description of what is invalid.
        reason: String,
    },

    /// A link frame points at a frame it cannot resolve to.
    #[error("invalid format: broken link from frame {frame} to frame {target} ({reason})")]
    BrokenLink {
        /// The link frame.
        frame: usize,
        /// The frame it points at.
        target: usize,
        /// Why the link was rejected.
        reason: &'static str,
    },

    /// A declared size needs more bytes than are available.
    #[error("truncated data at offset {offset:#x}: needed {needed} bytes, {available} available")]
    TruncatedData {
        /// Byte offset where the read started.
        offset: u64,
        /// Number of bytes the read needed.
        needed: u64,
        /// Number of bytes that were left.
        available: u64,
    },

    /// A seek or index fell outside its bounds.
    #[error("{what} {index} out of range (limit {limit})")]
    OutOfRange {
        /// What was being indexed (e.g. "frame", "seek").
        what: &'static str,
        /// The requested index or position.
        index: u64,
        /// The exclusive (or inclusive, for seeks) bound.
        limit: u64,
    },

    /// Two archive entries share a name. The first one is kept.
    #[error("duplicate entry '{name}' at offset {offset:#x} (keeping entry at {first_offset:#x})")]
    DuplicateEntry {
        /// The duplicated name.
        name: String,
        /// Data offset of the ignored entry.
        offset: u64,
        /// Data offset of the entry that is kept.
        first_offset: u64,
    },

    /// An archive entry could not be found by name.
    #[error("entry not found in NPK: {name}")]
    EntryNotFound {
        /// The requested name.
        name: String,
    },

    /// The archive checksum did not match its header.
    #[error("NPK checksum mismatch over {covered} header bytes")]
    ChecksumMismatch {
        /// Number of bytes covered by the checksum.
        covered: usize,
    },

    // ==================== Frame Errors ====================
    /// Frame data is malformed for its (known) encoding.
    #[error("corrupt frame {frame} at offset {offset:#x}: {reason}")]
    CorruptFrame {
        /// The frame index.
        frame: usize,
        /// Byte offset within the inner file.
        offset: u64,
        /// Description of the violation.
        reason: String,
    },

    /// Frame uses a pixel format or compression tag that is not understood.
    #[error("unsupported encoding on frame {frame}: format tag {format_tag:#x}, compression tag {compression_tag:#x}")]
    UnsupportedEncoding {
        /// The frame index.
        frame: usize,
        /// Raw pixel format tag.
        format_tag: u32,
        /// Raw compression tag.
        compression_tag: u32,
    },

    // ==================== Compression Errors ====================
    /// Zlib decompression failed.
    #[error("Zlib decompression failed: {message}")]
    ZlibDecompressionFailed {
        /// The error message.
        message: String,
    },

    // ==================== Export Errors ====================
    /// Failed to encode PNG image.
    #[error("failed to encode PNG: {message}")]
    PngEncodeFailed {
        /// The encoding error message.
        message: String,
    },

    // ==================== Context ====================
    /// Wraps an error with the inner file it occurred in.
    #[error("{name}: {source}")]
    InEntry {
        /// The archive entry name.
        name: String,
        /// The underlying error.
        #[source]
        source: Box<Error>,
    },
}

/// Coarse classification of [`Error`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidFormat,
    TruncatedData,
    OutOfRange,
    DuplicateEntry,
    CorruptFrame,
    UnsupportedEncoding,
    NotFound,
    Io,
    Encode,
}

impl Error {
    /// Attach an archive entry name to this error.
    #[must_use]
    pub fn in_entry(self, name: impl Into<String>) -> Self {
        match self {
            // Already named, keep the innermost context
            err @ Error::InEntry { .. } => err,
            err => Error::InEntry {
                name: name.into(),
                source: Box::new(err),
            },
        }
    }

    /// The error with any entry context stripped off.
    #[must_use]
    pub fn root(&self) -> &Error {
        match self {
            Error::InEntry { source, .. } => source.root(),
            err => err,
        }
    }

    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self.root() {
            Error::Io(_) | Error::IoAt { .. } => ErrorKind::Io,
            Error::InvalidFormat { .. } | Error::BrokenLink { .. } | Error::ChecksumMismatch { .. } => {
                ErrorKind::InvalidFormat
            }
            Error::TruncatedData { .. } => ErrorKind::TruncatedData,
            Error::OutOfRange { .. } => ErrorKind::OutOfRange,
            Error::DuplicateEntry { .. } => ErrorKind::DuplicateEntry,
            Error::EntryNotFound { .. } => ErrorKind::NotFound,
            Error::CorruptFrame { .. } | Error::ZlibDecompressionFailed { .. } => ErrorKind::CorruptFrame,
            Error::UnsupportedEncoding { .. } => ErrorKind::UnsupportedEncoding,
            Error::PngEncodeFailed { .. } => ErrorKind::Encode,
            Error::InEntry { .. } => unreachable!("root() strips entry context"),
        }
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::PngEncodeFailed {
            message: err.to_string(),
        }
    }
}

/// A specialized Result type for `DFOLib` operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_looks_through_entry_context() {
        let err = Error::TruncatedData {
            offset: 16,
            needed: 4,
            available: 2,
        }
        .in_entry("sprite/a.img");

        assert_eq!(err.kind(), ErrorKind::TruncatedData);
        assert!(err.to_string().starts_with("sprite/a.img: truncated data"));
    }

    #[test]
    fn test_in_entry_keeps_innermost_name() {
        let err = Error::EntryNotFound { name: "x".into() }
            .in_entry("inner.img")
            .in_entry("outer.img");

        match err {
            Error::InEntry { name, .. } => assert_eq!(name, "inner.img"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_broken_link_is_invalid_format() {
        let err = Error::BrokenLink {
            frame: 1,
            target: 1,
            reason: "target is a link",
        };
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
        assert!(err.to_string().contains("broken link"));
    }
}
