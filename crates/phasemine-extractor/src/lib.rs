//! Phasemine Extractor
//!
//! Converts cleaned paper text into alloy/phase records using an LLM.
//!
//! # Overview
//!
//! A document is split into chunks of whole lines that fit the model's token
//! budget. Each chunk is sent to the completion provider with a structured
//! extraction prompt, strictly one after another. The model's answer is
//! treated as untrusted text: JSON objects are salvaged from it or the chunk
//! contributes nothing. Records are then deduplicated per document.
//!
//! # Architecture
//!
//! ```text
//! Document → LineChunker → PromptBuilder → CompletionProvider → Sanitizer
//!                                                                  │
//!                          results dir ← dedup_records ← merge ←───┘
//! ```
//!
//! # Example Usage
//!
//! ```
//! use phasemine_domain::Document;
//! use phasemine_extractor::{Extractor, ExtractorConfig, Record};
//! use phasemine_llm::{ApproxTokenizer, MockProvider};
//!
//! let llm = MockProvider::new(r#"{"Alloy":"AlCoCrFeNi","Phase":"BCC"} plus trailing prose"#);
//! let extractor = Extractor::new(llm, ApproxTokenizer::default(), 4096, ExtractorConfig::default()).unwrap();
//!
//! let doc = Document::new("paper", "## Experimental\nAlloy AlCoCrFeNi shows BCC.");
//! let result = extractor.extract_document(&doc).unwrap();
//!
//! assert_eq!(result.records, vec![Record::new("AlCoCrFeNi", "BCC")]);
//! ```

#![warn(missing_docs)]

mod batch;
mod chunking;
mod config;
mod dedup;
mod error;
mod extractor;
mod prompt;
mod sanitizer;
mod types;

pub use batch::{document_stems, write_records, BatchSummary, Pipeline};
pub use chunking::LineChunker;
pub use config::{ExtractorConfig, PipelineConfig, Quantization};
pub use dedup::dedup_records;
pub use error::ExtractorError;
pub use extractor::Extractor;
pub use prompt::{context_window, PromptBuilder, RefinementPass, DELIMITER};
pub use sanitizer::{sanitize_response, EmptyReason, SanitizedResponse, Sanitizer};
pub use types::{
    CanonicalValue, Chunk, ChunkExtraction, ChunkOutcome, DocumentResult, DocumentStats, Record,
    RecordKey, ALLOY_FIELD, PHASE_FIELD,
};
