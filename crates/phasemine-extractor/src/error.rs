//! Error types for the Extractor

use thiserror::Error;

/// Errors that abort extraction
///
/// Malformed model output is never an error; it degrades to an empty chunk
/// result. Only collaborator failures and output-side I/O reach the caller.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Completion provider can no longer serve requests
    #[error("Completion provider unavailable: {0}")]
    Provider(String),

    /// Tokenizer failed to count a chunk
    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
