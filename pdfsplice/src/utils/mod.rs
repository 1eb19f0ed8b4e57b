//! Path expansion and formatting helpers.

use std::path::PathBuf;

use crate::error::{PdfSpliceError, Result};

/// Expand glob patterns into filesystem paths, pattern by pattern.
///
/// Accepts anything iterable with items that convert to `&str`, e.g.
/// `&[&str]`, `Vec<String>`, or `Vec<&str>`. A pattern without glob
/// metacharacters is passed through unchanged, so a missing file is reported
/// later as `FileNotFound` instead of silently disappearing. Matches of one
/// pattern are sorted; patterns keep the order they were given in.
///
/// # Errors
///
/// `InvalidConfig` for a malformed pattern or an unreadable match.
pub fn collect_paths_for_patterns<T>(patterns: T) -> Result<Vec<PathBuf>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let mut resolved_paths = Vec::new();

    for pattern in patterns {
        resolved_paths.extend(collect_paths_for_pattern(pattern.as_ref())?);
    }

    Ok(resolved_paths)
}

fn collect_paths_for_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    if !pattern.contains(['*', '?', '[']) {
        return Ok(vec![PathBuf::from(pattern)]);
    }

    let entries = glob::glob(pattern).map_err(|err| {
        PdfSpliceError::invalid_config(format!("invalid pattern '{pattern}': {err}"))
    })?;

    let mut resolved_paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|err| PdfSpliceError::invalid_config(err.to_string()))?;
        resolved_paths.push(path);
    }
    resolved_paths.sort();

    if resolved_paths.is_empty() {
        log::warn!("Pattern '{pattern}' matched no files");
    }
    Ok(resolved_paths)
}

/// Format a byte count as a human-readable string.
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{size} bytes")
    }
}
