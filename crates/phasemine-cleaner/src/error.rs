//! Error types for the Cleaner

use thiserror::Error;

/// Errors that can occur while cleaning documents
#[derive(Error, Debug)]
pub enum CleanerError {
    /// Reading or writing a document failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
