//! Conversion of parsed arguments into a validated [`Config`].

use crate::args::{Cli, Command};

use pdfsplice::PageSpec;
use pdfsplice::config::{Config, Operation, OverwriteMode};
use pdfsplice::error::{PdfSpliceError, Result};
use pdfsplice::ops::Rotation;
use pdfsplice::utils::collect_paths_for_patterns;
use pdfsplice::writer::WriteOptions;

impl Cli {
    /// Convert CLI arguments into a validated Config.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A page specification or rotation is invalid
    /// - A glob pattern is malformed
    /// - Configuration validation fails
    pub fn to_config(&self) -> Result<Config> {
        let operation = match &self.command {
            Command::Merge { inputs, output } => Operation::Merge {
                inputs: collect_paths_for_patterns(inputs)?,
                output: output.clone(),
            },
            Command::Split {
                input,
                pages: Some(pages),
                each: false,
                output,
            } => Operation::Split {
                input: input.clone(),
                pages: PageSpec::parse(pages)?,
                output: output.clone(),
            },
            Command::Split { input, output, .. } => Operation::Burst {
                input: input.clone(),
                output_dir: output.clone(),
            },
            Command::Extract {
                input,
                page,
                output,
            } => Operation::Extract {
                input: input.clone(),
                page: *page,
                output: output.clone(),
            },
            Command::Rotate {
                input,
                pages,
                degrees,
                output,
            } => Operation::Rotate {
                input: input.clone(),
                pages: PageSpec::parse(pages)?,
                rotation: Rotation::from_degrees(*degrees)?,
                output: output.clone(),
            },
            Command::Delete {
                input,
                pages,
                output,
            } => Operation::Delete {
                input: input.clone(),
                pages: PageSpec::parse(pages)?,
                output: output.clone(),
            },
            Command::Info { inputs, json } => Operation::Info {
                inputs: collect_paths_for_patterns(inputs)?,
                json: *json,
            },
        };

        let overwrite_mode = if self.force {
            OverwriteMode::Force
        } else if self.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Prompt
        };

        let config = Config {
            operation,
            verbose: self.verbose > 0,
            quiet: self.quiet,
            overwrite_mode,
            write_options: WriteOptions {
                xref_stream: self.xref_stream,
                compress: self.compress,
                renumber: self.renumber,
            },
            jobs: self.jobs,
        };

        config.validate().map_err(|e| {
            PdfSpliceError::invalid_config(format!("Configuration validation failed: {e}"))
        })?;

        Ok(config)
    }
}
