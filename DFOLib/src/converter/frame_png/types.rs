//! Per-frame export outcome

use std::path::{Path, PathBuf};

use crate::error::Error;

/// Outcome of exporting one frame
#[derive(Debug)]
pub struct QuickSaveResult {
    /// The frame that was requested
    pub frame_index: usize,
    /// Folder the frame was (or would have been) written to
    pub output_folder: PathBuf,
    /// Written file, or why nothing was written
    pub outcome: Result<PathBuf, Error>,
}

impl QuickSaveResult {
    #[must_use]
    pub fn saved(frame_index: usize, output_folder: impl Into<PathBuf>, path: PathBuf) -> Self {
        Self {
            frame_index,
            output_folder: output_folder.into(),
            outcome: Ok(path),
        }
    }

    #[must_use]
    pub fn failed(frame_index: usize, output_folder: impl Into<PathBuf>, error: Error) -> Self {
        Self {
            frame_index,
            output_folder: output_folder.into(),
            outcome: Err(error),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    #[must_use]
    pub fn output_path(&self) -> Option<&Path> {
        self.outcome.as_ref().ok().map(PathBuf::as_path)
    }

    #[must_use]
    pub fn error(&self) -> Option<&Error> {
        self.outcome.as_ref().err()
    }
}
