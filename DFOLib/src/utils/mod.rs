//! Utility functions

pub mod cursor;
pub mod path;

pub use cursor::ByteCursor;
pub use path::{entry_base_name, frame_output_path};
