//! # dfolib
//!
//! A pure-Rust library for reading Dungeon Fighter Online game assets.
//!
//! ## Supported Formats
//!
//! - **NPK archives** - `NeoplePack_Bill` packages with encrypted entry names
//! - **IMG sprite sheets** - `Neople Img File` version 2, raw, zlib and RLE frames
//! - **PNG** - Export of decoded frames
//!
//! ## Quick Start
//!
//! ### Reading an Archive
//!
//! ```no_run
//! use dfolib::npk::NpkFile;
//!
//! let npk = NpkFile::open("sprite_interface.NPK")?;
//! for entry in npk.archive().entries() {
//!     println!("{} ({} bytes)", entry.name, entry.size);
//! }
//! # Ok::<(), dfolib::Error>(())
//! ```
//!
//! ### Exporting Frames
//!
//! ```no_run
//! use std::path::Path;
//! use dfolib::session::{QuickSaveSummary, Session};
//!
//! let session = Session::new();
//! let handle = session.open("sprite_interface.NPK")?;
//! let results = session.quick_save_frames(
//!     &handle,
//!     "sprite/interface/cursor.img",
//!     &[0, 1, 2],
//!     Path::new("out"),
//! );
//! println!("{}", QuickSaveSummary::from_results(&results).status);
//! # Ok::<(), dfolib::Error>(())
//! ```
//!
//! ### Using the Prelude
//!
//! ```
//! use dfolib::prelude::*;
//!
//! // Now you have access to:
//! // - NpkFile, NpkArchive, NpkEntry
//! // - ImgFile, DecodedFrame, FrameMetadata
//! // - Session, ArchiveHandle, QuickSaveResult, QuickSaveSummary
//! // - Error, ErrorKind, Result
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `dfolib` command-line binary

pub mod error;
pub mod compression;
pub mod converter;
pub mod img;
pub mod npk;
pub mod session;
pub mod utils;

#[cfg(test)]
mod testing;

// Re-exports for convenience
pub use error::{Error, ErrorKind, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, ErrorKind, Result};

    pub use crate::npk::{NpkArchive, NpkEntry, NpkFile};
    pub use crate::img::{DecodedFrame, FrameHeader, FrameMetadata, ImgFile};

    pub use crate::converter::{QuickSaveResult, export_frame_png};
    pub use crate::session::{ArchiveHandle, QuickSaveSummary, Session};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
