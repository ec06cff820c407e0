//! Format conversion utilities

pub mod frame_png;

pub use frame_png::{QuickSaveResult, export_frame_png, frame_to_png_bytes};
