//! CLI command for listing the frames of an IMG entry

use std::path::Path;

use crate::img::FrameMetadata;
use super::resolve_entry;
use crate::session::ArchiveHandle;

fn describe(frame: &FrameMetadata) -> String {
    match frame.link_target {
        Some(target) => format!("-> {target}"),
        None => format!("{}/{}", frame.format, frame.compression),
    }
}

pub fn execute(source: &Path, entry: &str, json: bool) -> anyhow::Result<()> {
    let handle = ArchiveHandle::open(source)?;
    let entry = resolve_entry(&handle, entry)?;
    let frames = handle.list_frames(&entry)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&frames)?);
        return Ok(());
    }

    println!(
        "{:>5}  {:>9}  {:>11}  {:>9}  ENCODING",
        "INDEX", "SIZE", "KEY", "CANVAS"
    );
    for frame in &frames {
        let size = format!("{}x{}", frame.width, frame.height);
        let key = format!("{},{}", frame.key_x, frame.key_y);
        let canvas = format!("{}x{}", frame.max_width, frame.max_height);
        println!(
            "{:>5}  {size:>9}  {key:>11}  {canvas:>9}  {}",
            frame.index,
            describe(frame)
        );
    }
    println!();
    println!("{} frames in {}", frames.len(), entry);

    Ok(())
}
