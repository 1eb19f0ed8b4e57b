//! Filesystem boundary: async loading and atomic saving of documents.

pub mod reader;
pub mod writer;

pub use reader::{LoadResult, LoadStatistics, LoadedPdf, PdfReader};
pub use writer::{PdfWriter, WriteStatistics};
