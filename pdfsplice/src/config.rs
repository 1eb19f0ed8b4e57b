//! Configuration module for pdfsplice.
//!
//! The CLI turns its arguments into a [`Config`]: one [`Operation`] plus the
//! switches shared by every operation (verbosity, overwrite policy, loader
//! and serializer options). [`Config::validate`] rejects combinations that
//! cannot work before any file is touched.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

use crate::ops::Rotation;
use crate::page_spec::PageSpec;
use crate::writer::WriteOptions;

/// Output file overwrite behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Prompt the user before overwriting (default).
    #[default]
    Prompt,
    /// Always overwrite without prompting.
    Force,
    /// Never overwrite, error if file exists.
    NoClobber,
}

/// The transformation to run, with its arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Concatenate all pages of `inputs`, in order.
    Merge {
        /// Source documents, in merge order.
        inputs: Vec<PathBuf>,
        /// Destination file.
        output: PathBuf,
    },

    /// Copy the selected pages into a new document.
    Split {
        /// Source document.
        input: PathBuf,
        /// Pages to keep.
        pages: PageSpec,
        /// Destination file.
        output: PathBuf,
    },

    /// Write every page of `input` to its own file inside `output_dir`.
    Burst {
        /// Source document.
        input: PathBuf,
        /// Directory receiving one file per page.
        output_dir: PathBuf,
    },

    /// Copy a single page into a new document.
    Extract {
        /// Source document.
        input: PathBuf,
        /// 1-based page number.
        page: u32,
        /// Destination file.
        output: PathBuf,
    },

    /// Rotate the selected pages (all pages for an empty selection).
    Rotate {
        /// Source document.
        input: PathBuf,
        /// Pages to rotate.
        pages: PageSpec,
        /// Clockwise rotation to add.
        rotation: Rotation,
        /// Destination file.
        output: PathBuf,
    },

    /// Remove the selected pages.
    Delete {
        /// Source document.
        input: PathBuf,
        /// Pages to remove.
        pages: PageSpec,
        /// Destination file.
        output: PathBuf,
    },

    /// Report metadata and structure without writing anything.
    Info {
        /// Documents to inspect.
        inputs: Vec<PathBuf>,
        /// Print JSON instead of text.
        json: bool,
    },
}

impl Operation {
    /// Short lowercase name, as used on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Merge { .. } => "merge",
            Self::Split { .. } | Self::Burst { .. } => "split",
            Self::Extract { .. } => "extract",
            Self::Rotate { .. } => "rotate",
            Self::Delete { .. } => "delete",
            Self::Info { .. } => "info",
        }
    }

    /// Documents this operation reads.
    pub fn inputs(&self) -> &[PathBuf] {
        match self {
            Self::Merge { inputs, .. } | Self::Info { inputs, .. } => inputs,
            Self::Split { input, .. }
            | Self::Burst { input, .. }
            | Self::Extract { input, .. }
            | Self::Rotate { input, .. }
            | Self::Delete { input, .. } => std::slice::from_ref(input),
        }
    }

    /// The single file this operation writes, if any.
    ///
    /// Bursting writes into a directory and is not covered here.
    pub fn output(&self) -> Option<&Path> {
        match self {
            Self::Merge { output, .. }
            | Self::Split { output, .. }
            | Self::Extract { output, .. }
            | Self::Rotate { output, .. }
            | Self::Delete { output, .. } => Some(output),
            Self::Burst { .. } | Self::Info { .. } => None,
        }
    }
}

/// Complete configuration for one pdfsplice run.
#[derive(Debug, Clone)]
pub struct Config {
    /// What to do.
    pub operation: Operation,

    /// Verbose output mode.
    pub verbose: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,

    /// File overwrite behavior.
    pub overwrite_mode: OverwriteMode,

    /// Serializer switches.
    pub write_options: WriteOptions,

    /// Number of documents loaded concurrently (None = auto-detect).
    pub jobs: Option<usize>,
}

impl Config {
    /// A configuration with default switches for `operation`.
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            verbose: false,
            quiet: false,
            overwrite_mode: OverwriteMode::default(),
            write_options: WriteOptions::default(),
            jobs: None,
        }
    }

    /// Validate the configuration.
    ///
    /// Checks for logical inconsistencies that do not need the filesystem.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No input files are specified
    /// - Verbose and quiet modes are both enabled
    /// - Jobs count is zero
    /// - The output path is also an input
    /// - A page selection that must name pages is empty
    pub fn validate(&self) -> Result<()> {
        let inputs = self.operation.inputs();
        if inputs.is_empty() {
            bail!("No input files specified");
        }

        if self.verbose && self.quiet {
            bail!("Cannot use both --verbose and --quiet");
        }

        if let Some(jobs) = self.jobs
            && jobs == 0
        {
            bail!("Number of jobs must be at least 1");
        }

        if let Some(output) = self.operation.output()
            && inputs.iter().any(|input| input == output)
        {
            bail!(
                "Output file cannot be the same as an input file: {}",
                output.display()
            );
        }

        match &self.operation {
            Operation::Split { pages, .. } | Operation::Delete { pages, .. } if pages.is_empty() => {
                bail!("--pages must select at least one page for {}", self.operation.name());
            }
            Operation::Extract { page: 0, .. } => {
                bail!("Page numbers start at 1");
            }
            _ => {}
        }

        Ok(())
    }

    /// Get the effective number of concurrent loads.
    ///
    /// Returns the configured job count, or the number of CPU cores if auto-detect.
    pub fn effective_jobs(&self) -> usize {
        self.jobs.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    /// Check if user-facing output should be displayed.
    pub fn should_print(&self) -> bool {
        !self.quiet
    }
}
