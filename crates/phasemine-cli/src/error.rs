//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Cleaning stage error
    #[error("Cleaning failed: {0}")]
    Cleaner(#[from] phasemine_cleaner::CleanerError),

    /// Extraction stage error
    #[error("Extraction failed: {0}")]
    Extractor(#[from] phasemine_extractor::ExtractorError),

    /// Provider or tokenizer setup error
    #[error("LLM error: {0}")]
    Llm(#[from] phasemine_llm::LlmError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
