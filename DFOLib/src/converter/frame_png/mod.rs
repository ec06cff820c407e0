//! Decoded frame → PNG export
//!
//! Files are written through a temporary file in the destination folder and
//! only renamed into place once fully written, so a failed export never
//! leaves a partial PNG behind under the final name.

mod types;

use std::io::Write;
use std::path::{Path, PathBuf};

use image::ImageEncoder;
use image::codecs::png::PngEncoder;
use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::img::DecodedFrame;
use crate::utils::frame_output_path;

pub use types::QuickSaveResult;

/// Encode a decoded frame as PNG bytes
///
/// # Errors
/// Returns [`Error::PngEncodeFailed`] if the encoder rejects the image.
pub fn frame_to_png_bytes(frame: &DecodedFrame) -> Result<Vec<u8>> {
    let mut png_data = Vec::new();
    PngEncoder::new(&mut png_data).write_image(
        frame.rgba(),
        frame.width(),
        frame.height(),
        image::ExtendedColorType::Rgba8,
    )?;
    Ok(png_data)
}

/// Write a frame to `<folder>/<base_name>_<frame index>.png`
///
/// The folder is created if it does not exist.
///
/// # Errors
/// Returns [`Error::PngEncodeFailed`] if encoding fails, or [`Error::IoAt`]
/// if the folder or file cannot be written. Nothing is left at the output
/// path on failure.
pub fn export_frame_png(frame: &DecodedFrame, folder: &Path, base_name: &str) -> Result<PathBuf> {
    let output_path = frame_output_path(folder, base_name, frame.index());

    // Encode first so an encoder failure never touches the disk
    let png_data = frame_to_png_bytes(frame)?;

    let io_at = |path: &Path| {
        let path = path.to_path_buf();
        move |source: std::io::Error| Error::IoAt { path, source }
    };

    std::fs::create_dir_all(folder).map_err(io_at(folder))?;

    let mut temp = NamedTempFile::new_in(folder).map_err(io_at(folder))?;
    temp.write_all(&png_data).map_err(io_at(temp.path()))?;
    temp.as_file().sync_all().map_err(io_at(temp.path()))?;

    // On failure the temp file is dropped, which deletes it
    temp.persist(&output_path)
        .map_err(|e| io_at(&output_path)(e.error))?;

    tracing::debug!("Wrote {}", output_path.display());
    Ok(output_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn checker() -> DecodedFrame {
        DecodedFrame::new(
            3,
            None,
            2,
            1,
            vec![255, 0, 0, 255, 0, 0, 255, 128],
        )
    }

    #[test]
    fn test_export_writes_png() {
        let temp = TempDir::new().unwrap();
        let path = export_frame_png(&checker(), temp.path(), "cursor").unwrap();

        assert_eq!(path, temp.path().join("cursor_3.png"));
        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (2, 1));
        assert_eq!(img, checker().to_image().unwrap());
        assert_eq!(img.get_pixel(1, 0).0, [0, 0, 255, 128]);
    }

    #[test]
    fn test_export_creates_folder() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("a").join("b");
        let path = export_frame_png(&checker(), &nested, "x").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_failed_export_leaves_nothing() {
        let temp = TempDir::new().unwrap();
        // A directory squatting on the output name makes the rename fail
        std::fs::create_dir(temp.path().join("x_3.png")).unwrap();

        assert!(export_frame_png(&checker(), temp.path(), "x").is_err());
        let leftovers: Vec<_> = std::fs::read_dir(temp.path())
            .unwrap()
            .filter_map(std::result::Result::ok)
            .filter(|e| e.path().is_file())
            .collect();
        assert!(leftovers.is_empty());
    }
}
