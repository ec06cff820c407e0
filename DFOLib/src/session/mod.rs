//! Open-archive session and the request/response surface used by front ends
//!
//! A [`Session`] holds at most one open archive. Opening another archive
//! swaps it in atomically: callers already holding an [`ArchiveHandle`] keep
//! working against their snapshot, and the old archive (with its parsed
//! sheets) is freed once the last handle is dropped.

mod summary;

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use rayon::prelude::*;

use crate::converter::{QuickSaveResult, export_frame_png};
use crate::error::Result;
use crate::img::{DecodedFrame, FrameMetadata, ImgFile};
use crate::npk::{NpkArchive, NpkEntry, NpkFile};
use crate::utils::entry_base_name;

pub use summary::QuickSaveSummary;

/// Archive bytes, file table, and the sheets parsed from it so far
#[derive(Debug)]
struct LoadedArchive {
    npk: NpkFile,
    sheets: Mutex<HashMap<String, Arc<ImgFile>>>,
}

/// Shared, read-only handle to an opened NPK.
///
/// Cheap to clone and safe to use from several threads at once.
#[derive(Debug, Clone)]
pub struct ArchiveHandle {
    inner: Arc<LoadedArchive>,
}

impl ArchiveHandle {
    /// Read and parse an NPK.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or its table is invalid.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let npk = NpkFile::open(path)?;
        Ok(Self::from_npk(npk))
    }

    /// Wrap an already parsed NPK.
    #[must_use]
    pub fn from_npk(npk: NpkFile) -> Self {
        Self {
            inner: Arc::new(LoadedArchive {
                npk,
                sheets: Mutex::new(HashMap::new()),
            }),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.inner.npk.path()
    }

    #[must_use]
    pub fn archive(&self) -> &NpkArchive {
        self.inner.npk.archive()
    }

    #[must_use]
    pub fn entries(&self) -> &[NpkEntry] {
        self.archive().entries()
    }

    /// Whether two handles refer to the same opened archive.
    #[must_use]
    pub fn same_archive(&self, other: &ArchiveHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Parsed sheet for an entry, parsing and caching it on first use.
    ///
    /// # Errors
    /// Returns [`crate::Error::EntryNotFound`] for unknown names, or any parse error
    /// from [`ImgFile::parse`]. Failed parses are not cached.
    pub fn inner_file(&self, name: &str) -> Result<Arc<ImgFile>> {
        if let Some(sheet) = self.sheets().get(name) {
            return Ok(Arc::clone(sheet));
        }

        // Parse without holding the lock so other sheets stay available
        let bytes = self.inner.npk.read_entry(name)?;
        let parsed = Arc::new(ImgFile::parse(name, bytes.to_vec())?);

        let mut sheets = self.sheets();
        let sheet = sheets.entry(name.to_string()).or_insert(parsed);
        Ok(Arc::clone(sheet))
    }

    /// Number of sheets parsed and cached so far
    #[must_use]
    pub fn cached_sheet_count(&self) -> usize {
        self.sheets().len()
    }

    /// Frame listing for an entry.
    ///
    /// # Errors
    /// See [`inner_file`](Self::inner_file).
    pub fn list_frames(&self, name: &str) -> Result<Vec<FrameMetadata>> {
        Ok(self.inner_file(name)?.metadata())
    }

    /// Decode one frame of an entry.
    ///
    /// # Errors
    /// See [`inner_file`](Self::inner_file) and [`ImgFile::decode_frame`].
    pub fn decode_frame(&self, name: &str, frame_index: usize) -> Result<DecodedFrame> {
        self.inner_file(name)?.decode_frame(frame_index)
    }

    /// Decode one frame and write it as `<folder>/<entry stem>_<index>.png`.
    pub fn quick_save_as_png(&self, name: &str, frame_index: usize, folder: &Path) -> QuickSaveResult {
        let outcome = self
            .decode_frame(name, frame_index)
            .and_then(|frame| export_frame_png(&frame, folder, &entry_base_name(name)));

        match outcome {
            Ok(path) => QuickSaveResult::saved(frame_index, folder, path),
            Err(e) => {
                tracing::warn!("Frame {} of {}: {}", frame_index, name, e);
                QuickSaveResult::failed(frame_index, folder, e)
            }
        }
    }

    /// Export several frames in parallel. One result per requested frame,
    /// in request order; a failing frame does not stop the others.
    pub fn quick_save_frames(&self, name: &str, frame_indices: &[usize], folder: &Path) -> Vec<QuickSaveResult> {
        let results: Vec<QuickSaveResult> = frame_indices
            .par_iter()
            .map(|&index| self.quick_save_as_png(name, index, folder))
            .collect();

        let saved = results.iter().filter(|r| r.is_success()).count();
        tracing::info!(
            "Exported {}/{} frames of {} to {}",
            saved,
            results.len(),
            name,
            folder.display()
        );
        results
    }

    fn sheets(&self) -> std::sync::MutexGuard<'_, HashMap<String, Arc<ImgFile>>> {
        self.inner.sheets.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The archive currently open in a front end.
#[derive(Debug, Default)]
pub struct Session {
    current: RwLock<Option<ArchiveHandle>>,
    opening: AtomicUsize,
}

/// Counts one open in progress for as long as it lives
struct OpeningGuard<'a>(&'a AtomicUsize);

impl<'a> OpeningGuard<'a> {
    fn new(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::AcqRel);
        Self(counter)
    }
}

impl Drop for OpeningGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an archive and make it current.
    ///
    /// The archive is fully parsed before it replaces the previous one; if
    /// parsing fails, the previous archive stays current.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or its table is invalid.
    pub fn open<P: AsRef<Path>>(&self, path: P) -> Result<ArchiveHandle> {
        let _guard = OpeningGuard::new(&self.opening);

        let handle = ArchiveHandle::open(path.as_ref())?;
        tracing::info!(
            "Opened {} ({} entries)",
            handle.path().display(),
            handle.entries().len()
        );

        let previous = self.write().replace(handle.clone());
        if let Some(previous) = previous {
            tracing::debug!("Released {}", previous.path().display());
        }
        Ok(handle)
    }

    /// The current archive, if any.
    #[must_use]
    pub fn current(&self) -> Option<ArchiveHandle> {
        self.read().clone()
    }

    /// Drop the current archive. Returns whether one was open.
    pub fn close(&self) -> bool {
        self.write().take().is_some()
    }

    /// Frame listing for an entry of `handle`.
    ///
    /// # Errors
    /// See [`ArchiveHandle::list_frames`].
    pub fn list_frames(&self, handle: &ArchiveHandle, inner_name: &str) -> Result<Vec<FrameMetadata>> {
        handle.list_frames(inner_name)
    }

    /// Export one frame of an entry of `handle` as PNG.
    pub fn quick_save_as_png(
        &self,
        handle: &ArchiveHandle,
        inner_name: &str,
        frame_index: usize,
        output_folder: &Path,
    ) -> QuickSaveResult {
        handle.quick_save_as_png(inner_name, frame_index, output_folder)
    }

    /// Export several frames of an entry of `handle` as PNGs.
    pub fn quick_save_frames(
        &self,
        handle: &ArchiveHandle,
        inner_name: &str,
        frame_indices: &[usize],
        output_folder: &Path,
    ) -> Vec<QuickSaveResult> {
        handle.quick_save_frames(inner_name, frame_indices, output_folder)
    }

    /// Whether another archive can be opened right now (no open in progress).
    #[must_use]
    pub fn can_open(&self) -> bool {
        self.opening.load(Ordering::Acquire) == 0
    }

    /// Whether a quick save of `selected` frames from `inner_name` can run:
    /// an archive is open, the entry exists in it, and at least one frame is
    /// selected.
    #[must_use]
    pub fn can_quick_save(&self, inner_name: Option<&str>, selected: &[usize]) -> bool {
        let Some(name) = inner_name else {
            return false;
        };
        !selected.is_empty()
            && self
                .read()
                .as_ref()
                .is_some_and(|handle| handle.archive().find(name).is_some())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Option<ArchiveHandle>> {
        self.current.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Option<ArchiveHandle>> {
        self.current.write().unwrap_or_else(PoisonError::into_inner)
    }
}
