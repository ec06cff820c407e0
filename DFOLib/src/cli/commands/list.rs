//! CLI command for listing NPK contents

use std::path::Path;

use crate::npk::{NpkEntry, NpkFile};

/// Simple glob pattern matching (supports * and ?), case-insensitive
fn matches_glob(pattern: &str, text: &str) -> bool {
    let pattern_chars: Vec<char> = pattern.chars().collect();
    let text_chars: Vec<char> = text.chars().collect();
    matches_glob_recursive(&pattern_chars, &text_chars, 0, 0)
}

fn matches_glob_recursive(pattern: &[char], text: &[char], pi: usize, ti: usize) -> bool {
    if pi == pattern.len() {
        return ti == text.len();
    }

    match pattern[pi] {
        '*' => (ti..=text.len()).any(|i| matches_glob_recursive(pattern, text, pi + 1, i)),
        '?' => ti < text.len() && matches_glob_recursive(pattern, text, pi + 1, ti + 1),
        c => {
            ti < text.len()
                && text[ti].eq_ignore_ascii_case(&c)
                && matches_glob_recursive(pattern, text, pi + 1, ti + 1)
        }
    }
}

/// Whether an entry matches a filter, by full path or by file name
fn entry_matches(pattern: &str, entry: &NpkEntry) -> bool {
    let file_name = entry.name.rsplit('/').next().unwrap_or(&entry.name);
    matches_glob(pattern, file_name) || matches_glob(pattern, &entry.name)
}

/// Format byte size for human-readable output
fn format_size(bytes: u32) -> String {
    if bytes >= 1_048_576 {
        format!("{:.1}M", f64::from(bytes) / 1_048_576.0)
    } else if bytes >= 1024 {
        format!("{:.1}K", f64::from(bytes) / 1024.0)
    } else {
        format!("{bytes}")
    }
}

pub fn execute(source: &Path, filter: Option<&str>, count: bool, json: bool) -> anyhow::Result<()> {
    let npk = NpkFile::open(source)?;
    let archive = npk.archive();

    let filtered: Vec<&NpkEntry> = archive
        .entries()
        .iter()
        .filter(|e| filter.is_none_or(|pattern| entry_matches(pattern, e)))
        .collect();

    if count {
        println!("{}", filtered.len());
        return Ok(());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&filtered)?);
        return Ok(());
    }

    println!("{:>10}  {:>10}  PATH", "OFFSET", "SIZE");
    for entry in &filtered {
        println!(
            "{:>10}  {:>10}  {}",
            entry.offset,
            format_size(entry.size),
            entry.name
        );
    }

    let total: u64 = filtered.iter().map(|e| u64::from(e.size)).sum();
    println!();
    println!("{} entries, {} bytes", filtered.len(), total);

    if !archive.checksum_valid() {
        eprintln!("warning: archive checksum does not match its table");
    }
    for warning in archive.warnings() {
        eprintln!("warning: {warning}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_glob() {
        assert!(matches_glob("*.img", "cursor.img"));
        assert!(matches_glob("sprite/*", "sprite/interface/cursor.img"));
        assert!(matches_glob("CURSOR.?MG", "cursor.img"));
        assert!(!matches_glob("*.ogg", "cursor.img"));
        assert!(!matches_glob("cursor", "cursor.img"));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512");
        assert_eq!(format_size(2048), "2.0K");
        assert_eq!(format_size(3 * 1_048_576), "3.0M");
    }
}
