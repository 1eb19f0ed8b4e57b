//! pdfsplice - Merge, split, rotate and prune PDF documents as object graphs.
//!
//! The library loads a PDF file into an in-memory arena of indirect
//! objects (a [`lopdf::Document`]), applies one structural transformation
//! and serializes a new, self-consistent file. It supports:
//!
//! - Loading classic, cross-reference-stream, hybrid and incrementally
//!   updated files
//! - Merging documents and extracting, rotating or deleting pages
//! - Reading the document information dictionary
//! - A small page-range language (`"1, 3-5, 8"`) for selecting pages
//!
//! # Examples
//!
//! ## Path-level API
//!
//! ```no_run
//! use std::path::{Path, PathBuf};
//!
//! # async fn example() -> pdfsplice::Result<()> {
//! let inputs = [PathBuf::from("a.pdf"), PathBuf::from("b.pdf")];
//! let pages = pdfsplice::api::merge(&inputs, Path::new("merged.pdf")).await?;
//! println!("Created {pages} page document");
//! # Ok(())
//! # }
//! ```
//!
//! ## Working on documents in memory
//!
//! ```no_run
//! use pdfsplice::{PageSpec, ops, parser, writer};
//!
//! # fn example() -> pdfsplice::Result<()> {
//! let bytes = std::fs::read("input.pdf")?;
//! let document = parser::load(&bytes)?;
//! let first_three = ops::extract(&document, &PageSpec::parse("1-3")?)?;
//! std::fs::write("first-three.pdf", writer::write(&first_three)?)?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod config;
pub mod error;
pub mod graph;
pub mod io;
pub mod ops;
pub mod output;
pub mod page_spec;
pub mod page_tree;
pub mod parser;
pub mod utils;
pub mod validation;
pub mod writer;

// Re-export commonly used types
pub use config::Config;
pub use error::{PdfSpliceError, Result};
pub use graph::ObjectGraph;
pub use lopdf;
pub use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
pub use page_spec::PageSpec;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
