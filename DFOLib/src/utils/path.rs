//! Path utilities

use std::path::{Path, PathBuf};

/// Normalize path separators to forward slashes (NPK names use `/`)
pub fn normalize_path<P: AsRef<Path>>(path: P) -> String {
    path.as_ref().to_string_lossy().replace('\\', "/")
}

/// File stem of an archive entry name, used as the base of exported file names.
///
/// `sprite/character/swordman/sm_body0000.img` becomes `sm_body0000`.
/// Falls back to `"frame"` for names with no usable stem.
pub fn entry_base_name(entry_name: &str) -> String {
    let normalized = normalize_path(entry_name);
    let file_name = normalized.rsplit('/').next().unwrap_or_default();
    let stem = match file_name.rfind('.') {
        Some(0) | None => file_name,
        Some(dot) => &file_name[..dot],
    };

    if stem.is_empty() {
        "frame".to_string()
    } else {
        stem.to_string()
    }
}

/// `<folder>/<base_name>_<frame_index>.png`
pub fn frame_output_path(folder: &Path, base_name: &str, frame_index: usize) -> PathBuf {
    folder.join(format!("{base_name}_{frame_index}.png"))
}
