//! PDF writing and saving operations.
//!
//! Documents are serialized on the blocking pool and written to a temporary
//! sibling of the destination, which is renamed into place once the bytes
//! are flushed and synced. A failed save never leaves a partial file at the
//! destination.
//!
//! # Examples
//!
//! ```no_run
//! use pdfsplice::io::PdfWriter;
//! use pdfsplice::Document;
//! use std::path::Path;
//!
//! # async fn example(doc: Document) -> Result<(), Box<dyn std::error::Error>> {
//! let writer = PdfWriter::new();
//! writer.save(&doc, Path::new("output.pdf")).await?;
//! # Ok(())
//! # }
//! ```

use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use lopdf::Document;
use tokio::task;

use crate::error::{PdfSpliceError, Result};
use crate::utils::format_file_size;
use crate::writer::{self, WriteOptions};

/// Statistics about a write operation.
#[derive(Debug, Clone)]
pub struct WriteStatistics {
    /// Time taken to serialize and write the file.
    pub write_time: Duration,

    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Path where the file was written.
    pub output_path: PathBuf,

    /// Whether stream compression was requested.
    pub compressed: bool,
}

impl WriteStatistics {
    /// Format file size as human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// PDF writer with configurable serialization.
#[derive(Debug, Clone, Default)]
pub struct PdfWriter {
    options: WriteOptions,
}

impl PdfWriter {
    /// Create a new PDF writer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with custom serialization options.
    pub fn with_options(options: WriteOptions) -> Self {
        Self { options }
    }

    /// The options this writer serializes with.
    pub fn options(&self) -> &WriteOptions {
        &self.options
    }

    /// Save a PDF document to a file.
    ///
    /// Missing parent directories are created.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The document has no usable `/Root`
    /// - The output (or its temporary sibling) cannot be created
    /// - Writing, syncing or renaming fails
    pub async fn save(&self, doc: &Document, path: &Path) -> Result<()> {
        self.save_with_stats(doc, path).await.map(|_| ())
    }

    /// Save a PDF and return statistics about the operation.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use pdfsplice::io::PdfWriter;
    /// # use pdfsplice::Document;
    /// # use std::path::Path;
    /// # async fn example(doc: Document) -> Result<(), Box<dyn std::error::Error>> {
    /// let writer = PdfWriter::new();
    /// let stats = writer.save_with_stats(&doc, Path::new("output.pdf")).await?;
    /// println!("Wrote {} in {:?}", stats.format_file_size(), stats.write_time);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn save_with_stats(&self, doc: &Document, path: &Path) -> Result<WriteStatistics> {
        let path_buf = path.to_path_buf();
        let options = self.options;
        let doc = doc.clone();

        task::spawn_blocking(move || {
            let start = Instant::now();
            let bytes = writer::write_with(&doc, &options)?;
            write_atomically(&path_buf, &bytes)?;

            let write_time = start.elapsed();
            log::debug!(
                "Wrote {} ({}) in {write_time:?}",
                path_buf.display(),
                format_file_size(bytes.len() as u64)
            );

            Ok(WriteStatistics {
                write_time,
                file_size: bytes.len() as u64,
                output_path: path_buf,
                compressed: options.compress,
            })
        })
        .await
        .map_err(|err| PdfSpliceError::from(std::io::Error::other(err)))?
    }

    /// Check if a file can be written to the given path.
    ///
    /// Performs pre-flight checks without writing anything.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the parent exists but is not a writable directory.
    pub async fn can_write(&self, path: &Path) -> Result<()> {
        let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
            return Ok(());
        };

        match tokio::fs::metadata(parent).await {
            // Created on save
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(PdfSpliceError::FileNotAccessible {
                path: parent.to_path_buf(),
                source,
            }),
            Ok(metadata) if !metadata.is_dir() => Err(PdfSpliceError::invalid_config(format!(
                "Output parent is not a directory: {}",
                parent.display()
            ))),
            Ok(metadata) if metadata.permissions().readonly() => {
                Err(PdfSpliceError::invalid_config(format!(
                    "Output directory is not writable: {}",
                    parent.display()
                )))
            }
            Ok(_) => Ok(()),
        }
    }

    /// Check if output file exists.
    pub async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }
}

/// `<dest>.tmp` next to the destination, on the same filesystem.
fn temp_path(dest: &Path) -> PathBuf {
    let mut name = OsString::from(dest.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

fn write_atomically(dest: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| PdfSpliceError::FailedToCreateOutput {
            path: dest.to_path_buf(),
            source,
        })?;
    }

    let temp = temp_path(dest);
    let result = write_file(&temp, bytes).and_then(|()| {
        std::fs::rename(&temp, dest).map_err(|source| PdfSpliceError::FailedToWrite {
            path: dest.to_path_buf(),
            source,
        })
    });

    if result.is_err() {
        let _ = std::fs::remove_file(&temp);
    }
    result
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let file = std::fs::File::create(path).map_err(|source| PdfSpliceError::FailedToCreateOutput {
        path: path.to_path_buf(),
        source,
    })?;
    let failed = |source| PdfSpliceError::FailedToWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut buffered = std::io::BufWriter::new(file);
    buffered.write_all(bytes).map_err(failed)?;
    let file = buffered.into_inner().map_err(|err| failed(err.into_error()))?;
    file.sync_all().map_err(failed)
}
