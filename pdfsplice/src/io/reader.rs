//! PDF reading and loading operations.
//!
//! Files are read with `tokio::fs` and parsed on the blocking pool, so
//! loading many inputs never stalls the async runtime.
//!
//! # Examples
//!
//! ```no_run
//! use pdfsplice::io::PdfReader;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = PdfReader::new();
//! let paths = vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")];
//! let (results, stats) = reader.load_all(&paths, 4).await;
//! println!("Loaded {} of {} files", stats.success_count, results.len());
//! # Ok(())
//! # }
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use lopdf::Document;
use tokio::task;

use crate::error::{PdfSpliceError, Result};
use crate::page_tree;
use crate::parser;
use crate::utils::format_file_size;

/// A loaded PDF document with metadata.
#[derive(Debug, Clone)]
pub struct LoadedPdf {
    /// The PDF document.
    pub document: Document,

    /// Path to the source file.
    pub path: PathBuf,

    /// Number of pages in the document.
    pub page_count: usize,

    /// Time taken to read and parse the file.
    pub load_time: Duration,

    /// File size in bytes.
    pub file_size: u64,
}

/// Result of a load operation (success or failure).
pub type LoadResult = Result<LoadedPdf>;

/// Statistics for a batch load operation.
#[derive(Debug, Clone, Default)]
pub struct LoadStatistics {
    /// Number of PDFs successfully loaded.
    pub success_count: usize,

    /// Number of PDFs that failed to load.
    pub failure_count: usize,

    /// Total time taken for all loads.
    pub total_time: Duration,

    /// Average time per successful load.
    pub average_time: Duration,

    /// Total size of successfully loaded files.
    pub total_size: u64,

    /// Total number of pages loaded.
    pub total_pages: usize,
}

impl LoadStatistics {
    fn from_results(results: &[LoadResult], total_time: Duration) -> Self {
        let mut stats = Self {
            total_time,
            ..Self::default()
        };
        let mut total_load_time = Duration::ZERO;

        for result in results {
            match result {
                Ok(loaded) => {
                    stats.success_count += 1;
                    stats.total_size += loaded.file_size;
                    stats.total_pages += loaded.page_count;
                    total_load_time += loaded.load_time;
                }
                Err(_) => stats.failure_count += 1,
            }
        }

        if stats.success_count > 0 {
            stats.average_time = total_load_time / stats.success_count as u32;
        }
        stats
    }

    /// Format total size as human-readable string.
    pub fn format_total_size(&self) -> String {
        format_file_size(self.total_size)
    }
}

/// Loads PDF files from disk, one at a time or in batches.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfReader;

impl PdfReader {
    /// Create a reader.
    pub fn new() -> Self {
        Self
    }

    /// Load a single PDF document.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the PDF file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The path does not exist or is not a regular file
    /// - The file cannot be read
    /// - The file is not a PDF this library can load, or is encrypted
    /// - The page tree is broken
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use pdfsplice::io::PdfReader;
    /// # use std::path::Path;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let reader = PdfReader::new();
    /// let loaded = reader.load(Path::new("document.pdf")).await?;
    /// println!("Loaded {} pages in {:?}", loaded.page_count, loaded.load_time);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn load(&self, path: &Path) -> Result<LoadedPdf> {
        let path_buf = path.to_path_buf();
        let start = Instant::now();

        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|source| match source.kind() {
                ErrorKind::NotFound => PdfSpliceError::file_not_found(path_buf.clone()),
                _ => PdfSpliceError::FileNotAccessible {
                    path: path_buf.clone(),
                    source,
                },
            })?;
        if !metadata.is_file() {
            return Err(PdfSpliceError::not_a_file(path_buf));
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| PdfSpliceError::FileNotAccessible {
                path: path_buf.clone(),
                source,
            })?;

        let document = task::spawn_blocking(move || parser::load(&bytes))
            .await
            .map_err(|err| PdfSpliceError::from(std::io::Error::other(err)))?
            .map_err(|err| err.with_path(&path_buf))?;
        let page_count = page_tree::page_count(&document).map_err(|err| err.with_path(&path_buf))?;

        let load_time = start.elapsed();
        log::debug!(
            "Loaded {} ({page_count} pages, {}) in {load_time:?}",
            path_buf.display(),
            format_file_size(metadata.len())
        );

        Ok(LoadedPdf {
            document,
            path: path_buf,
            page_count,
            load_time,
            file_size: metadata.len(),
        })
    }

    /// Load multiple PDF documents one at a time, in order.
    pub async fn load_sequential(&self, paths: &[PathBuf]) -> Vec<LoadResult> {
        let mut results = Vec::with_capacity(paths.len());

        for path in paths {
            results.push(self.load(path).await);
        }

        results
    }

    /// Load multiple PDF documents concurrently.
    ///
    /// At most `workers` files are in flight at once. Results come back in
    /// the same order as `paths`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use pdfsplice::io::PdfReader;
    /// # use std::path::PathBuf;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let reader = PdfReader::new();
    /// let paths = vec![
    ///     PathBuf::from("a.pdf"),
    ///     PathBuf::from("b.pdf"),
    ///     PathBuf::from("c.pdf"),
    /// ];
    ///
    /// for result in reader.load_parallel(&paths, 4).await {
    ///     match result {
    ///         Ok(loaded) => println!("Loaded: {}", loaded.path.display()),
    ///         Err(e) => eprintln!("Error: {}", e),
    ///     }
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn load_parallel(&self, paths: &[PathBuf], workers: usize) -> Vec<LoadResult> {
        use futures::stream::{self, StreamExt};

        let workers = workers.max(1);

        let tasks = paths.iter().enumerate().map(|(index, path)| {
            let path = path.clone();
            let reader = *self;
            async move { (index, reader.load(&path).await) }
        });

        let mut indexed: Vec<(usize, LoadResult)> = stream::iter(tasks)
            .buffer_unordered(workers)
            .collect()
            .await;

        indexed.sort_by_key(|(index, _)| *index);
        indexed.into_iter().map(|(_, result)| result).collect()
    }

    /// Load all PDFs, choosing sequential or concurrent loading by batch size.
    ///
    /// # Returns
    ///
    /// A tuple of (results, statistics); results are in input order.
    pub async fn load_all(
        &self,
        paths: &[PathBuf],
        max_workers: usize,
    ) -> (Vec<LoadResult>, LoadStatistics) {
        let start = Instant::now();

        // Small batches are not worth the scheduling overhead
        let results = if paths.len() <= 3 {
            self.load_sequential(paths).await
        } else {
            self.load_parallel(paths, max_workers).await
        };

        let stats = LoadStatistics::from_results(&results, start.elapsed());
        (results, stats)
    }
}
