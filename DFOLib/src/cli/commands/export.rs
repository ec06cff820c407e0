//! CLI command for exporting frames as PNG

use std::path::Path;
use std::time::Instant;

use serde::Serialize;

use super::resolve_entry;
use crate::cli::progress::{DISK, LOOKING_GLASS, PICTURE, print_done, print_step, simple_bar};
use crate::converter::QuickSaveResult;
use crate::session::{QuickSaveSummary, Session};

/// JSON row for one exported frame
#[derive(Serialize)]
struct ExportRow<'a> {
    frame: usize,
    path: Option<&'a Path>,
    error: Option<String>,
}

impl<'a> From<&'a QuickSaveResult> for ExportRow<'a> {
    fn from(result: &'a QuickSaveResult) -> Self {
        Self {
            frame: result.frame_index,
            path: result.output_path(),
            error: result.error().map(ToString::to_string),
        }
    }
}

pub fn execute(
    source: &Path,
    entry: &str,
    output: &Path,
    frames: &[usize],
    all: bool,
    quiet: bool,
    json: bool,
) -> anyhow::Result<()> {
    let start = Instant::now();
    let chatty = !quiet && !json;
    let session = Session::new();

    if chatty {
        print_step(1, 3, LOOKING_GLASS, &format!("Reading {}...", source.display()));
    }
    let handle = session.open(source)?;
    let entry = resolve_entry(&handle, entry)?;
    let entry = entry.as_str();

    let selected: Vec<usize> = if all {
        (0..handle.inner_file(entry)?.frame_count()).collect()
    } else {
        frames.to_vec()
    };
    if !session.can_quick_save(Some(entry), &selected) {
        anyhow::bail!("Nothing to export from {entry}");
    }

    if chatty {
        print_step(2, 3, PICTURE, &format!("Decoding {} frames...", selected.len()));
    }
    let results = if chatty {
        // One bar tick per frame, in request order
        let pb = simple_bar(selected.len() as u64, "Exporting");
        let results: Vec<QuickSaveResult> = selected
            .chunks(rayon::current_num_threads().max(1))
            .flat_map(|chunk| {
                let chunk_results = session.quick_save_frames(&handle, entry, chunk, output);
                pb.inc(chunk.len() as u64);
                chunk_results
            })
            .collect();
        pb.finish_and_clear();
        results
    } else {
        session.quick_save_frames(&handle, entry, &selected, output)
    };

    let summary = QuickSaveSummary::from_results(&results);

    if json {
        let rows: Vec<ExportRow<'_>> = results.iter().map(ExportRow::from).collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else if chatty {
        print_step(3, 3, DISK, &summary.status);
        for failure in results.iter().filter_map(QuickSaveResult::error) {
            eprintln!("  {failure}");
        }
        print_done(start.elapsed());
    } else {
        println!("{}", summary.status);
    }

    if summary.failed > 0 {
        anyhow::bail!("{} of {} frames failed", summary.failed, results.len());
    }
    Ok(())
}
