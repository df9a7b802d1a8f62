//! Phasemine Domain Layer
//!
//! Core value types and collaborator boundaries for the phasemine pipeline.
//! Like every domain layer in this workspace it has no external dependencies:
//! infrastructure (HTTP clients, tokenizers, regex engines) lives in the
//! crates that implement these traits.
//!
//! ## Key Concepts
//!
//! - **Document**: OCR-derived paper text identified by its file stem
//! - **Phase**: The closed crystal-structure vocabulary records may report
//! - **Message**: A role-tagged turn in a completion dialog
//! - **Traits**: `TokenCounter` and `CompletionProvider`, the two external
//!   capabilities the pipeline consumes

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod message;
pub mod phase;
pub mod traits;

// Re-exports for convenience
pub use document::Document;
pub use message::{Message, Role};
pub use phase::{Phase, PhaseParseError};
pub use traits::{CompletionProvider, ProviderError, TokenCounter};
