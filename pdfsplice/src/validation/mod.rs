//! Input and output validation for pdfsplice.
//!
//! The validator loads documents through [`PdfReader`] and reports what a
//! user wants to know before (or instead of) transforming them: page
//! count, version, size and metadata. Output checks run before any
//! document is loaded so a doomed run fails fast.
//!
//! # Examples
//!
//! ```no_run
//! use pdfsplice::validation::Validator;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let validator = Validator::new();
//! let result = validator.validate_file(&PathBuf::from("test.pdf")).await?;
//! println!("PDF has {} pages", result.page_count);
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use lopdf::{Document, Object};
use serde::{Deserialize, Serialize};

use crate::config::{Config, OverwriteMode};
use crate::error::{PdfSpliceError, Result};
use crate::io::{LoadedPdf, PdfReader, PdfWriter};
use crate::graph::ObjectGraph;
use crate::ops;
use crate::page_tree;
use crate::utils::format_file_size;

/// Result of validating a single PDF file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// Path to the validated file.
    pub path: PathBuf,

    /// Number of pages in the PDF.
    pub page_count: usize,

    /// Effective PDF version.
    pub version: String,

    /// Size of the file in bytes.
    pub file_size: u64,

    /// Number of objects in the PDF.
    pub object_count: usize,

    /// First page's media box (width, height) in points, if available.
    pub page_dimensions: Option<(f64, f64)>,

    /// Entries of the information dictionary.
    pub metadata: BTreeMap<String, String>,
}

impl ValidationResult {
    /// Summarize a loaded document.
    pub fn from_loaded(loaded: &LoadedPdf) -> Self {
        Self {
            path: loaded.path.clone(),
            page_count: loaded.page_count,
            version: loaded.document.version.clone(),
            file_size: loaded.file_size,
            object_count: loaded.document.objects.len(),
            page_dimensions: first_page_dimensions(&loaded.document),
            metadata: ops::metadata(&loaded.document),
        }
    }

    /// Format the file size as a human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// Width and height of the first page's (possibly inherited) `/MediaBox`.
fn first_page_dimensions(doc: &Document) -> Option<(f64, f64)> {
    let page = page_tree::pages(doc).ok()?.into_iter().next()?;
    let media_box = page_tree::inherited(doc, page, b"MediaBox").ok()??;
    let media_box = doc.resolve(&media_box).found()?.as_array().ok()?.clone();
    let [llx, lly, urx, ury] = media_box.as_slice() else {
        return None;
    };
    let coordinate = |value: &Object| {
        let number = doc.resolve(value).found()?.as_float().ok()?;
        Some(f64::from(number))
    };
    let width = (coordinate(urx)? - coordinate(llx)?).abs();
    let height = (coordinate(ury)? - coordinate(lly)?).abs();
    Some((width, height))
}

/// Summary of validation results for multiple files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    /// Individual validation results for each file.
    pub results: Vec<ValidationResult>,

    /// Total number of pages across all files.
    pub total_pages: usize,

    /// Total file size in bytes.
    pub total_size: u64,

    /// Number of files that passed validation.
    pub files_validated: usize,

    /// Number of files that failed validation.
    pub files_failed: usize,
}

impl ValidationSummary {
    /// Create a summary from validation results.
    pub fn from_results(results: Vec<ValidationResult>) -> Self {
        let total_pages = results.iter().map(|r| r.page_count).sum();
        let total_size = results.iter().map(|r| r.file_size).sum();
        let files_validated = results.len();

        Self {
            results,
            total_pages,
            total_size,
            files_validated,
            files_failed: 0,
        }
    }

    /// Format the total file size as a human-readable string.
    pub fn format_total_size(&self) -> String {
        format_file_size(self.total_size)
    }
}

/// Validator for PDF files and output paths.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    reader: PdfReader,
}

impl Validator {
    /// Create a new validator with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a single PDF file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - File does not exist or is not a regular file
    /// - File is empty
    /// - File is not a loadable PDF (including encrypted files)
    pub async fn validate_file(&self, path: &Path) -> Result<ValidationResult> {
        if let Ok(metadata) = tokio::fs::metadata(path).await
            && metadata.is_file()
            && metadata.len() == 0
        {
            return Err(PdfSpliceError::malformed(format!("{}: file is empty", path.display())));
        }

        let loaded = self.reader.load(path).await?;
        Ok(ValidationResult::from_loaded(&loaded))
    }

    /// Validate multiple PDF files, loading up to `jobs` at once.
    ///
    /// With `continue_on_error`, failures are logged and counted instead of
    /// aborting.
    ///
    /// # Errors
    ///
    /// The first failure (in input order) unless `continue_on_error` is set;
    /// `InsufficientInput` when no file validates.
    pub async fn validate_files(
        &self,
        paths: &[PathBuf],
        jobs: usize,
        continue_on_error: bool,
    ) -> Result<ValidationSummary> {
        let (loaded, _stats) = self.reader.load_all(paths, jobs).await;

        let mut results = Vec::with_capacity(loaded.len());
        let mut failed_count = 0;
        for (path, outcome) in paths.iter().zip(loaded) {
            match outcome {
                Ok(loaded) => results.push(ValidationResult::from_loaded(&loaded)),
                Err(err) if continue_on_error => {
                    log::warn!("Skipping {}: {err}", path.display());
                    failed_count += 1;
                }
                Err(err) => return Err(err),
            }
        }

        if results.is_empty() {
            return Err(PdfSpliceError::InsufficientInput {
                required: 1,
                provided: 0,
            });
        }

        let mut summary = ValidationSummary::from_results(results);
        summary.files_failed = failed_count;
        Ok(summary)
    }

    /// Validate the output path of `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The output exists and the overwrite mode is `NoClobber`
    /// - The output directory exists but is not writable
    pub async fn validate_output(&self, config: &Config) -> Result<()> {
        let Some(output) = config.operation.output() else {
            return Ok(());
        };

        let writer = PdfWriter::new();
        if config.overwrite_mode == OverwriteMode::NoClobber && writer.exists(output).await {
            return Err(PdfSpliceError::output_exists(output.to_path_buf()));
        }
        writer.can_write(output).await
    }
}
