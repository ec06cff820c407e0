use clap::Subcommand;
use std::path::PathBuf;

use crate::session::ArchiveHandle;

pub mod execute;
pub mod export;
pub mod frames;
pub mod list;

#[derive(Subcommand)]
pub enum Commands {
    /// List the entries of an NPK archive
    List {
        /// NPK file
        #[arg(short, long)]
        source: PathBuf,

        /// Only list entries matching glob pattern (e.g., "*.img", "sprite/character/*")
        #[arg(long)]
        filter: Option<String>,

        /// Only show count of matching entries
        #[arg(short, long)]
        count: bool,

        /// Print entries as JSON
        #[arg(long, conflicts_with = "count")]
        json: bool,
    },

    /// List the frames of an IMG entry inside an NPK archive
    Frames {
        /// NPK file
        #[arg(short, long)]
        source: PathBuf,

        /// Entry path inside the archive (e.g., "sprite/interface/cursor.img")
        #[arg(short, long)]
        entry: String,

        /// Print frame metadata as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export frames of an IMG entry as PNG files
    Export {
        /// NPK file
        #[arg(short, long)]
        source: PathBuf,

        /// Entry path inside the archive
        #[arg(short, long)]
        entry: String,

        /// Output folder (created if missing)
        #[arg(short, long)]
        output: PathBuf,

        /// Frame indices to export, comma separated (e.g., "0,2,5")
        #[arg(long, value_delimiter = ',', required_unless_present = "all", conflicts_with = "all")]
        frames: Vec<usize>,

        /// Export every frame of the entry
        #[arg(long)]
        all: bool,

        /// Suppress progress bar
        #[arg(short, long)]
        quiet: bool,

        /// Print per-frame results as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Entry name as stored in the archive. Exact matches win; otherwise the
/// first entry whose name matches ignoring ASCII case.
pub(crate) fn resolve_entry(handle: &ArchiveHandle, name: &str) -> anyhow::Result<String> {
    let entry = handle
        .archive()
        .find_ignore_case(name)
        .ok_or_else(|| anyhow::anyhow!("No entry named {name} in {}", handle.path().display()))?;
    Ok(entry.name.clone())
}
