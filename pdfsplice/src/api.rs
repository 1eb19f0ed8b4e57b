//! Path-level entry points.
//!
//! Each function validates its arguments, loads the input(s), runs one
//! operation and only then writes the result. Nothing is written when any
//! step fails, and a destination is replaced atomically.
//!
//! The free functions use default loader and writer options; [`Splicer`]
//! carries explicit ones.
//!
//! # Examples
//!
//! ```no_run
//! use std::path::{Path, PathBuf};
//!
//! # async fn example() -> pdfsplice::Result<()> {
//! let inputs = [PathBuf::from("a.pdf"), PathBuf::from("b.pdf")];
//! let pages = pdfsplice::api::merge(&inputs, Path::new("merged.pdf")).await?;
//! pdfsplice::api::rotate(Path::new("merged.pdf"), "1-2", 90, Path::new("rotated.pdf")).await?;
//! println!("merged {pages} pages");
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use lopdf::Document;

use crate::error::{PdfSpliceError, Result};
use crate::io::{PdfReader, PdfWriter};
use crate::ops::{self, Rotation};
use crate::page_spec::PageSpec;
use crate::page_tree;

/// Loader, writer and concurrency settings shared by the entry points.
#[derive(Debug, Clone)]
pub struct Splicer {
    reader: PdfReader,
    writer: PdfWriter,
    jobs: usize,
}

impl Default for Splicer {
    fn default() -> Self {
        Self {
            reader: PdfReader::new(),
            writer: PdfWriter::new(),
            jobs: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        }
    }
}

impl Splicer {
    /// Default reader and writer, one load per CPU core.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `reader` for every load.
    pub fn with_reader(mut self, reader: PdfReader) -> Self {
        self.reader = reader;
        self
    }

    /// Use `writer` for every save.
    pub fn with_writer(mut self, writer: PdfWriter) -> Self {
        self.writer = writer;
        self
    }

    /// Load at most `jobs` inputs concurrently.
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    async fn load(&self, path: &Path) -> Result<Document> {
        Ok(self.reader.load(path).await?.document)
    }

    /// Read the information dictionary of `path`.
    pub async fn metadata(&self, path: &Path) -> Result<BTreeMap<String, String>> {
        let document = self.load(path).await?;
        Ok(ops::metadata(&document))
    }

    /// Concatenate `paths` into `dest` and return the merged page count.
    ///
    /// # Errors
    ///
    /// `InsufficientInput` for fewer than two paths, checked before any
    /// file is opened; otherwise the first load failure in input order.
    pub async fn merge(&self, paths: &[PathBuf], dest: &Path) -> Result<usize> {
        if paths.len() < 2 {
            return Err(PdfSpliceError::InsufficientInput {
                required: 2,
                provided: paths.len(),
            });
        }

        let (results, stats) = self.reader.load_all(paths, self.jobs).await;
        let documents = results
            .into_iter()
            .map(|result| result.map(|loaded| loaded.document))
            .collect::<Result<Vec<_>>>()?;
        log::info!(
            "Loaded {} document(s), {} page(s), {} in {:?}",
            stats.success_count,
            stats.total_pages,
            stats.format_total_size(),
            stats.total_time
        );

        let sources: Vec<&Document> = documents.iter().collect();
        let merged = ops::merge(&sources)?;
        let page_count = page_tree::page_count(&merged)?;

        self.writer.save(&merged, dest).await?;
        Ok(page_count)
    }

    /// Copy the selected pages of `path` into `dest`.
    pub async fn split(&self, path: &Path, pages: &PageSpec, dest: &Path) -> Result<()> {
        let document = self.load(path).await?;
        let extracted = ops::extract(&document, pages)?;
        self.writer.save(&extracted, dest).await
    }

    /// Write every page of `path` to its own file in `dir`.
    ///
    /// Files are named `<stem>-<n>.pdf` with `n` zero-padded to the width
    /// of the page count. All pages are extracted before the first file is
    /// written.
    pub async fn split_each(&self, path: &Path, dir: &Path) -> Result<Vec<PathBuf>> {
        let document = self.load(path).await?;
        let parts = ops::split_each(&document)?;

        let stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "page".to_string());
        let width = parts.len().to_string().len();

        let mut written = Vec::with_capacity(parts.len());
        for (index, part) in parts.iter().enumerate() {
            let dest = dir.join(format!("{stem}-{:0width$}.pdf", index + 1));
            self.writer.save(part, &dest).await?;
            written.push(dest);
        }
        Ok(written)
    }

    /// Copy page `number` of `path` into `dest`.
    pub async fn extract_page(&self, path: &Path, number: u32, dest: &Path) -> Result<()> {
        let document = self.load(path).await?;
        let extracted = ops::extract_page(&document, number)?;
        self.writer.save(&extracted, dest).await
    }

    /// Rotate the selected pages (all pages when empty) by `rotation`.
    pub async fn rotate(
        &self,
        path: &Path,
        pages: &PageSpec,
        rotation: Rotation,
        dest: &Path,
    ) -> Result<()> {
        let document = self.load(path).await?;
        let rotated = ops::rotate(&document, pages, rotation)?;
        self.writer.save(&rotated, dest).await
    }

    /// Remove the selected pages from `path`, writing the rest to `dest`.
    pub async fn delete(&self, path: &Path, pages: &PageSpec, dest: &Path) -> Result<()> {
        let document = self.load(path).await?;
        let remaining = ops::delete(&document, pages)?;
        self.writer.save(&remaining, dest).await
    }
}

/// Read the information dictionary of `path` as text.
pub async fn metadata(path: &Path) -> Result<BTreeMap<String, String>> {
    Splicer::default().metadata(path).await
}

/// Concatenate `paths` into `dest`; returns the merged page count.
pub async fn merge(paths: &[PathBuf], dest: &Path) -> Result<usize> {
    Splicer::default().merge(paths, dest).await
}

/// Copy the pages selected by `spec` into `dest`.
pub async fn split(path: &Path, spec: &str, dest: &Path) -> Result<()> {
    let pages = PageSpec::parse(spec)?;
    Splicer::default().split(path, &pages, dest).await
}

/// Copy one page into `dest`.
pub async fn extract_page(path: &Path, number: u32, dest: &Path) -> Result<()> {
    Splicer::default().extract_page(path, number, dest).await
}

/// Rotate the selected pages (all pages for an empty `spec`) by `degrees`.
pub async fn rotate(path: &Path, spec: &str, degrees: i64, dest: &Path) -> Result<()> {
    let pages = PageSpec::parse(spec)?;
    let rotation = Rotation::from_degrees(degrees)?;
    Splicer::default().rotate(path, &pages, rotation, dest).await
}

/// Remove the selected pages, writing the rest to `dest`.
pub async fn delete(path: &Path, spec: &str, dest: &Path) -> Result<()> {
    let pages = PageSpec::parse(spec)?;
    Splicer::default().delete(path, &pages, dest).await
}
