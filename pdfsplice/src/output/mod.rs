//! Output formatting and display for pdfsplice.
//!
//! User-facing text for the CLI, kept apart from the `log` records the
//! library emits.
//!
//! # Examples
//!
//! ```no_run
//! use pdfsplice::output::OutputFormatter;
//! use pdfsplice::config::Config;
//!
//! # fn example(config: Config) {
//! let formatter = OutputFormatter::from_config(&config);
//! formatter.info("Starting merge operation");
//! formatter.success("Merge completed successfully");
//! # }
//! ```

pub mod formatter;

pub use formatter::{MessageLevel, OutputFormatter};

use crate::validation::{ValidationResult, ValidationSummary};

/// Display validation summary to the user.
pub fn display_validation_summary(formatter: &OutputFormatter, summary: &ValidationSummary) {
    if summary.files_failed > 0 {
        formatter.warning(&format!(
            "{} file(s) failed validation",
            summary.files_failed
        ));
    }

    formatter.info(&format!(
        "Validated {} file(s): {} pages, {}",
        summary.files_validated,
        summary.total_pages,
        summary.format_total_size()
    ));
}

/// Display the structure and metadata of one document.
pub fn display_validation_result(formatter: &OutputFormatter, result: &ValidationResult) {
    formatter.section(&result.path.display().to_string());
    for (label, value) in summary_lines(result) {
        formatter.field(&label, &value);
    }
    formatter.detail("Objects", &result.object_count.to_string());
}

/// Label/value pairs shown for a document, metadata first.
pub fn summary_lines(result: &ValidationResult) -> Vec<(String, String)> {
    let mut lines: Vec<(String, String)> = result
        .metadata
        .iter()
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    lines.push(("PDF version".to_string(), result.version.clone()));
    lines.push(("Pages".to_string(), result.page_count.to_string()));
    if let Some((width, height)) = result.page_dimensions {
        lines.push(("Page size".to_string(), format!("{width} x {height} pt")));
    }
    lines.push(("File size".to_string(), result.format_file_size()));
    lines
}
