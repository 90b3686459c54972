//! Global error handling for clipmate
//!
//! This module provides a centralized error type that can represent errors
//! from all modules in the project.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::clipboard::ClipboardError;

/// Global error type for clipmate operations
#[derive(Error, Debug)]
pub enum ClipMateError {
    /// The root directory or one of its subdirectories could not be listed
    #[error("Cannot access directory {}: {source}", .path.display())]
    DirectoryAccess {
        /// Directory that failed to list
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Clipboard delivery failed
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] ClipboardError),

    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Preferences (de)serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A selected path does not exist in the current tree
    #[error("Selection not found in tree: {0}")]
    SelectionNotFound(String),

    /// The copy action was invoked without a selection
    #[error("Nothing selected")]
    EmptySelection,

    /// No directory has been opened in the session yet
    #[error("No directory opened")]
    NoDirectory,

    /// No document is held for delivery
    #[error("Nothing to deliver: {0}")]
    NothingToDeliver(String),
}

impl ClipMateError {
    /// Build a directory access error from a walkdir failure
    pub fn from_walk(fallback: PathBuf, err: walkdir::Error) -> Self {
        let path = err.path().map(PathBuf::from).unwrap_or(fallback);
        let source = match err.into_io_error() {
            Some(io_err) => io_err,
            None => io::Error::new(io::ErrorKind::Other, "filesystem loop detected"),
        };
        ClipMateError::DirectoryAccess { path, source }
    }
}

/// Specialized Result type for clipmate operations
pub type Result<T> = std::result::Result<T, ClipMateError>;

/// Creates a ClipMateError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::ClipMateError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

// Allow converting ClipMateError to io::Error for callers working in io::Result
impl From<ClipMateError> for io::Error {
    fn from(err: ClipMateError) -> Self {
        io::Error::new(io::ErrorKind::Other, err.to_string())
    }
}
