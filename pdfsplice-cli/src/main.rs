//! pdfsplice - Merge, split, rotate and prune PDF documents.
//!
//! Thin command-line front end over the `pdfsplice` library.

mod args;
mod cli;

use clap::Parser;
use std::path::Path;
use std::process;

use crate::args::Cli;
use pdfsplice::api::Splicer;
use pdfsplice::config::{Config, Operation, OverwriteMode};
use pdfsplice::error::PdfSpliceError;
use pdfsplice::io::{PdfReader, PdfWriter};
use pdfsplice::output::{OutputFormatter, display_validation_result, display_validation_summary};
use pdfsplice::validation::Validator;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}

/// Log level from `-v`/`-q`; `RUST_LOG` wins when set.
fn log_level(cli: &Cli) -> log::LevelFilter {
    if cli.quiet {
        return log::LevelFilter::Error;
    }
    match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

fn init_logging(cli: &Cli) {
    env_logger::Builder::new()
        .filter_level(log_level(cli))
        .parse_env("RUST_LOG")
        .format_timestamp(None)
        .init();
}

/// Main application logic.
async fn run(cli: Cli) -> Result<(), PdfSpliceError> {
    let config = cli.to_config()?;
    let formatter = OutputFormatter::from_config(&config);

    let validator = Validator::new();
    if let Operation::Info { inputs, json } = &config.operation {
        let summary = validator
            .validate_files(inputs, config.effective_jobs(), inputs.len() > 1)
            .await?;
        if *json {
            let rendered = serde_json::to_string_pretty(&summary)
                .map_err(|err| PdfSpliceError::from(std::io::Error::other(err)))?;
            println!("{rendered}");
        } else {
            for result in &summary.results {
                display_validation_result(&formatter, result);
            }
            if summary.results.len() > 1 || summary.files_failed > 0 {
                formatter.blank_line();
                display_validation_summary(&formatter, &summary);
            }
        }
        return Ok(());
    }

    validator.validate_output(&config).await?;
    if let Some(output) = config.operation.output() {
        handle_output_overwrite(output, config.overwrite_mode, &formatter).await?;
    }

    let splicer = Splicer::new()
        .with_reader(PdfReader::new())
        .with_writer(PdfWriter::with_options(config.write_options))
        .with_jobs(config.effective_jobs());

    execute(&splicer, &config, &formatter).await
}

async fn execute(
    splicer: &Splicer,
    config: &Config,
    formatter: &OutputFormatter,
) -> Result<(), PdfSpliceError> {
    match &config.operation {
        Operation::Merge { inputs, output } => {
            formatter.info(&format!("Merging {} file(s)...", inputs.len()));
            let pages = splicer.merge(inputs, output).await?;
            formatter.success(&format!("Wrote {} ({pages} pages)", output.display()));
            if formatter.is_quiet() {
                println!("{pages}");
            }
        }
        Operation::Split {
            input,
            pages,
            output,
        } => {
            splicer.split(input, pages, output).await?;
            formatter.success(&format!(
                "Wrote {} page(s) to {}",
                pages.len(),
                output.display()
            ));
        }
        Operation::Burst { input, output_dir } => {
            let written = splicer.split_each(input, output_dir).await?;
            for (index, path) in written.iter().enumerate() {
                formatter.debug(&format!("{}: {}", index + 1, path.display()));
            }
            formatter.success(&format!(
                "Wrote {} file(s) to {}",
                written.len(),
                output_dir.display()
            ));
        }
        Operation::Extract {
            input,
            page,
            output,
        } => {
            splicer.extract_page(input, *page, output).await?;
            formatter.success(&format!("Wrote page {page} to {}", output.display()));
        }
        Operation::Rotate {
            input,
            pages,
            rotation,
            output,
        } => {
            splicer.rotate(input, pages, *rotation, output).await?;
            let target = if pages.is_empty() {
                "all pages".to_string()
            } else {
                format!("{} page(s)", pages.len())
            };
            formatter.success(&format!(
                "Rotated {target} by {rotation}, wrote {}",
                output.display()
            ));
        }
        Operation::Delete {
            input,
            pages,
            output,
        } => {
            splicer.delete(input, pages, output).await?;
            formatter.success(&format!(
                "Deleted {} page(s), wrote {}",
                pages.len(),
                output.display()
            ));
        }
        Operation::Info { .. } => {}
    }
    Ok(())
}

/// Handle output file overwrite scenarios.
async fn handle_output_overwrite(
    output: &Path,
    mode: OverwriteMode,
    formatter: &OutputFormatter,
) -> Result<(), PdfSpliceError> {
    if !PdfWriter::new().exists(output).await {
        return Ok(());
    }

    match mode {
        OverwriteMode::Force => Ok(()),
        OverwriteMode::NoClobber => Err(PdfSpliceError::output_exists(output.to_path_buf())),
        OverwriteMode::Prompt => {
            // Nobody to ask in quiet mode
            if formatter.is_quiet() {
                return Err(PdfSpliceError::output_exists(output.to_path_buf()));
            }

            formatter.warning(&format!("Output file already exists: {}", output.display()));

            use std::io::{self, Write};
            print!("Overwrite? [y/N]: ");
            io::stdout().flush().ok();

            let mut response = String::new();
            io::stdin().read_line(&mut response)?;

            let response = response.trim().to_lowercase();
            if response == "y" || response == "yes" {
                Ok(())
            } else {
                Err(PdfSpliceError::Cancelled)
            }
        }
    }
}
