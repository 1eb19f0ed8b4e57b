//! Error types for pdfsplice.
//!
//! Every fallible operation in the library returns [`PdfSpliceError`].
//! Variants carry enough context to produce an actionable message for the
//! user and map to a stable process exit code for the CLI.
//!
//! # Error Categories
//!
//! - **Selection Errors**: malformed page specs, empty selections, pages out of range
//! - **Filesystem Errors**: missing inputs, unwritable outputs
//! - **PDF Errors**: structurally broken files, unsupported features
//! - **Configuration Errors**: invalid option combinations

use std::io;
use std::path::PathBuf;

/// Result type alias for pdfsplice operations.
pub type Result<T> = std::result::Result<T, PdfSpliceError>;

/// Main error type for pdfsplice operations.
#[derive(Debug, thiserror::Error)]
pub enum PdfSpliceError {
    /// The page specification string does not follow the page-range grammar.
    #[error("Invalid page specification '{spec}'\n  Reason: {reason}")]
    InvalidPageSpec {
        /// The offending input, verbatim.
        spec: String,
        /// What is wrong with it.
        reason: String,
    },

    /// An operation that needs at least one page received none.
    #[error("No pages selected for {operation}")]
    EmptySelection {
        /// Name of the operation that was refused.
        operation: &'static str,
    },

    /// A page number exceeds the document's page count.
    #[error(
        "Page {page} is out of range\n  Document has {total_pages} page(s). Page numbers must be between 1 and {total_pages}"
    )]
    PageOutOfRange {
        /// Requested 1-based page number.
        page: u32,
        /// Number of pages in the document.
        total_pages: usize,
    },

    /// Too few input documents were supplied.
    #[error("At least {required} input documents are required, got {provided}")]
    InsufficientInput {
        /// Minimum number of inputs.
        required: usize,
        /// Number of inputs actually supplied.
        provided: usize,
    },

    /// Rotation is not a multiple of 90 degrees.
    #[error("Invalid rotation: {degrees}\n  Rotation must be a multiple of 90 degrees")]
    InvalidRotation {
        /// Requested rotation in degrees.
        degrees: i64,
    },

    /// Input file was not found.
    #[error("File not found: {}", .path.display())]
    FileNotFound {
        /// Path to the file that was not found.
        path: PathBuf,
    },

    /// Input path exists but is not a regular file.
    #[error("Not a file: {}", .path.display())]
    NotAFile {
        /// Path that is not a file.
        path: PathBuf,
    },

    /// Input file exists but cannot be read.
    #[error("Cannot access file: {}\n  Reason: {source}", .path.display())]
    FileNotAccessible {
        /// Path to the inaccessible file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Output file already exists and overwrite is not allowed.
    #[error(
        "Output file already exists: {}\n  Use --force to overwrite or choose a different output path",
        .path.display()
    )]
    OutputExists {
        /// Path to the existing output file.
        path: PathBuf,
    },

    /// Failed to create the output file.
    #[error("Failed to create output file: {}\n  Reason: {source}", .path.display())]
    FailedToCreateOutput {
        /// Path where output should be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to write to the output file.
    #[error("Failed to write to output file: {}\n  Reason: {source}", .path.display())]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The document is structurally broken beyond recovery.
    #[error("Malformed PDF: {details}")]
    MalformedPdf {
        /// What was found to be broken.
        details: String,
    },

    /// The document uses a feature this library recognizes but does not handle.
    #[error("Unsupported PDF feature: {feature}")]
    UnsupportedFeature {
        /// Name of the feature.
        feature: String,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// User cancelled the operation.
    #[error("Operation cancelled by user")]
    Cancelled,

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },
}

impl From<anyhow::Error> for PdfSpliceError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<PdfSpliceError>() {
            Ok(inner) => inner,
            Err(err) => Self::invalid_config(err.to_string()),
        }
    }
}

impl From<lopdf::Error> for PdfSpliceError {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(source) => Self::Io { source },
            lopdf::Error::Decryption(_) | lopdf::Error::UnsupportedSecurityHandler(_) => {
                Self::unsupported("encryption")
            }
            lopdf::Error::Unimplemented(feature) => Self::unsupported(feature),
            other => Self::malformed(other.to_string()),
        }
    }
}

impl PdfSpliceError {
    /// Create an InvalidPageSpec error.
    pub fn invalid_page_spec(spec: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPageSpec {
            spec: spec.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileNotFound error.
    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    /// Create a NotAFile error.
    pub fn not_a_file(path: PathBuf) -> Self {
        Self::NotAFile { path }
    }

    /// Create an OutputExists error.
    pub fn output_exists(path: PathBuf) -> Self {
        Self::OutputExists { path }
    }

    /// Create a MalformedPdf error.
    pub fn malformed(details: impl Into<String>) -> Self {
        Self::MalformedPdf {
            details: details.into(),
        }
    }

    /// Create an UnsupportedFeature error.
    pub fn unsupported(feature: impl Into<String>) -> Self {
        Self::UnsupportedFeature {
            feature: feature.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Attach the source file to a structural error.
    ///
    /// Loader errors are produced from bytes and know nothing about paths;
    /// the I/O boundary calls this so the user sees which input was broken.
    pub fn with_path(self, path: &std::path::Path) -> Self {
        match self {
            Self::MalformedPdf { details } => Self::MalformedPdf {
                details: format!("{}: {details}", path.display()),
            },
            Self::UnsupportedFeature { feature } => Self::UnsupportedFeature {
                feature: format!("{feature} (in {})", path.display()),
            },
            other => other,
        }
    }

    /// Check if this error was caused by user input that can simply be re-entered.
    ///
    /// Page-spec and selection errors are local to the argument; the documents
    /// involved are fine.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidPageSpec { .. }
                | Self::EmptySelection { .. }
                | Self::PageOutOfRange { .. }
                | Self::InsufficientInput { .. }
                | Self::InvalidRotation { .. }
                | Self::InvalidConfig { .. }
        )
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidPageSpec { .. } => 1,
            Self::EmptySelection { .. } => 1,
            Self::PageOutOfRange { .. } => 1,
            Self::InsufficientInput { .. } => 1,
            Self::InvalidRotation { .. } => 1,
            Self::InvalidConfig { .. } => 1,
            Self::FileNotFound { .. } => 2,
            Self::NotAFile { .. } => 2,
            Self::FileNotAccessible { .. } => 2,
            Self::MalformedPdf { .. } => 3,
            Self::UnsupportedFeature { .. } => 3,
            Self::OutputExists { .. } => 4,
            Self::FailedToCreateOutput { .. } => 5,
            Self::FailedToWrite { .. } => 5,
            Self::Io { .. } => 5,
            Self::Cancelled => 130, // Standard exit code for SIGINT
        }
    }
}
