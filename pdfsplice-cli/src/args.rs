//! Command-line definitions for pdfsplice.
//!
//! Only the `clap` types live here; the build script renders the man page
//! from them.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Merge, split, rotate and prune PDF documents.
///
/// pdfsplice edits PDF files structurally: pages are copied, reordered,
/// rotated or removed as objects, never re-rendered.
#[derive(Parser, Debug)]
#[command(name = "pdfsplice")]
#[command(version)]
#[command(about = "Merge, split, rotate and prune PDF documents", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// What to do
    #[command(subcommand)]
    pub command: Command,

    /// More log output; repeat for more detail (-v info, -vv debug, -vvv trace)
    ///
    /// RUST_LOG overrides the level chosen here.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Overwrite existing output files without confirmation
    #[arg(short, long, global = true)]
    pub force: bool,

    /// Never overwrite existing output files
    #[arg(long, global = true, conflicts_with = "force")]
    pub no_clobber: bool,

    /// Flate-compress uncompressed streams in the output
    #[arg(long, global = true)]
    pub compress: bool,

    /// Write a cross-reference stream instead of a classic table
    #[arg(long, global = true)]
    pub xref_stream: bool,

    /// Renumber output objects consecutively
    #[arg(long, global = true)]
    pub renumber: bool,

    /// Number of input files loaded concurrently (default: CPU cores)
    #[arg(short, long, global = true, value_name = "N")]
    pub jobs: Option<usize>,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Concatenate documents in the given order
    ///
    /// Examples:
    ///   pdfsplice merge a.pdf b.pdf -o out.pdf
    ///   pdfsplice merge 'chapters/*.pdf' -o book.pdf
    Merge {
        /// Input files or glob patterns, in merge order
        #[arg(required = true, value_name = "FILE")]
        inputs: Vec<String>,

        /// Output file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Copy selected pages into a new document, or burst every page
    ///
    /// Examples:
    ///   pdfsplice split in.pdf --pages "1, 3-5" -o part.pdf
    ///   pdfsplice split in.pdf --each -o pages/
    Split {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Pages to keep, e.g. "1, 3-5, 8"
        #[arg(long, value_name = "SPEC", required_unless_present = "each")]
        pages: Option<String>,

        /// Write each page to its own file inside the output directory
        #[arg(long, conflicts_with = "pages")]
        each: bool,

        /// Output file (or directory with --each)
        #[arg(short, long, value_name = "PATH")]
        output: PathBuf,
    },

    /// Copy a single page into a new document
    Extract {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// 1-based page number
        #[arg(long, value_name = "N")]
        page: u32,

        /// Output file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Rotate pages clockwise by a multiple of 90 degrees
    ///
    /// Without --pages every page is rotated.
    Rotate {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Pages to rotate, e.g. "2-4"
        #[arg(long, value_name = "SPEC", default_value = "")]
        pages: String,

        /// Rotation in degrees; negative values rotate counter-clockwise
        #[arg(long, value_name = "DEG", allow_negative_numbers = true)]
        degrees: i64,

        /// Output file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Remove pages and everything only they used
    Delete {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Pages to remove, e.g. "1, 7-9"
        #[arg(long, value_name = "SPEC")]
        pages: String,

        /// Output file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Show metadata and structure
    Info {
        /// Input files or glob patterns
        #[arg(required = true, value_name = "FILE")]
        inputs: Vec<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}
