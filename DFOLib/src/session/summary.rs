//! Status line for a finished quick save

use std::path::PathBuf;

use serde::Serialize;

use crate::converter::QuickSaveResult;

/// Aggregate of a quick-save request, as reported to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuickSaveSummary {
    pub saved: usize,
    pub failed: usize,
    pub status: String,
}

impl QuickSaveSummary {
    /// Build the status line for a batch of export results.
    ///
    /// - every frame saved, one frame: `Saved to <path>`
    /// - every frame saved, several: `Saved <n> images to <folder>`
    /// - exactly one failure: that failure's message
    /// - several failures: a generic notice
    #[must_use]
    pub fn from_results(results: &[QuickSaveResult]) -> Self {
        let failed: Vec<&QuickSaveResult> = results.iter().filter(|r| !r.is_success()).collect();
        let saved = results.len() - failed.len();

        let status = match (results, failed.as_slice()) {
            ([], _) => "No frames selected.".to_string(),
            (_, [only]) => only
                .error()
                .map_or_else(|| "Export failed.".to_string(), ToString::to_string),
            (_, [_, _, ..]) => "There were errors saving some frames.".to_string(),
            ([single], []) => {
                let path = single.output_path().map_or_else(PathBuf::new, PathBuf::from);
                format!("Saved to {}", path.display())
            }
            ([first, ..], []) => {
                format!("Saved {} images to {}", results.len(), first.output_folder.display())
            }
        };

        Self {
            saved,
            failed: failed.len(),
            status,
        }
    }

    #[must_use]
    pub fn all_saved(&self) -> bool {
        self.failed == 0 && self.saved > 0
    }
}
