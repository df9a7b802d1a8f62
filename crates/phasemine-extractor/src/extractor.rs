//! Core Extractor implementation

use crate::chunking::LineChunker;
use crate::config::ExtractorConfig;
use crate::dedup::dedup_records;
use crate::error::ExtractorError;
use crate::prompt::PromptBuilder;
use crate::sanitizer::{SanitizedResponse, Sanitizer};
use crate::types::{Chunk, ChunkExtraction, ChunkOutcome, DocumentResult, DocumentStats};
use phasemine_domain::{CompletionProvider, Document, Message, ProviderError, TokenCounter};
use tracing::{debug, info, warn};

/// The Extractor turns cleaned paper text into alloy/phase records
///
/// A document is chunked by token budget and every chunk is sent to the
/// completion provider in order, one request at a time. Answers are
/// sanitized, concatenated and deduplicated.
pub struct Extractor<L, T> {
    provider: L,
    chunker: LineChunker<T>,
    sanitizer: Sanitizer,
    config: ExtractorConfig,
}

impl<L, T> Extractor<L, T>
where
    L: CompletionProvider,
    T: TokenCounter,
{
    /// Create a new Extractor
    pub fn new(
        provider: L,
        tokenizer: T,
        max_chunk_length: usize,
        config: ExtractorConfig,
    ) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;
        Ok(Self {
            provider,
            chunker: LineChunker::new(tokenizer, max_chunk_length)?,
            sanitizer: Sanitizer::new(config.strict_records),
            config,
        })
    }

    /// Split text into chunks
    pub fn chunk(&self, text: &str) -> Result<Vec<Chunk>, ExtractorError> {
        self.chunker.chunk(text)
    }

    /// Extract records from one chunk
    ///
    /// A provider failure that only concerns this request degrades the chunk
    /// to an empty result. An unavailable provider is returned as an error.
    pub fn extract_chunk(&self, chunk: &Chunk) -> Result<ChunkExtraction, ExtractorError> {
        let prompt = PromptBuilder::new(&chunk.text()).build();
        debug!("Chunk {}: prompt length {} chars", chunk.index, prompt.len());

        let mut dialog = vec![Message::user(prompt)];
        let mut sanitized = match self.request(&dialog, chunk.index)? {
            Ok(response) => self.sanitizer.sanitize(&response),
            Err(reason) => return Ok(failed(chunk.index, reason)),
        };

        for pass in &self.config.refinement_passes {
            let previous = sanitized.to_json_string();
            dialog.push(Message::assistant(previous.clone()));
            dialog.push(Message::user(pass.prompt(&previous)));

            sanitized = match self.request(&dialog, chunk.index)? {
                Ok(response) => self.sanitizer.sanitize(&response),
                Err(reason) => return Ok(failed(chunk.index, reason)),
            };
            debug!("Chunk {}: {} left {} record(s)", chunk.index, pass, sanitized.records().len());
        }

        let outcome = match &sanitized {
            SanitizedResponse::Parsed(_) => ChunkOutcome::Parsed,
            SanitizedResponse::Empty(reason) => ChunkOutcome::Empty(*reason),
        };

        Ok(ChunkExtraction {
            chunk_index: chunk.index,
            records: sanitized.into_records(),
            outcome,
        })
    }

    /// Extract the deduplicated records of one document
    pub fn extract_document(&self, document: &Document) -> Result<DocumentResult, ExtractorError> {
        let chunks = self.chunk(&document.text)?;
        info!(
            "Extracting '{}' with {}: {} chunk(s)",
            document.id,
            self.provider.model_name(),
            chunks.len()
        );

        let mut stats = DocumentStats {
            id: document.id.clone(),
            chunks: chunks.len(),
            ..Default::default()
        };
        let mut merged = Vec::new();

        for chunk in &chunks {
            let extraction = self.extract_chunk(chunk)?;
            match extraction.outcome {
                ChunkOutcome::Parsed => {}
                ChunkOutcome::Empty(_) => stats.empty_chunks += 1,
                ChunkOutcome::Failed(_) => stats.failed_chunks += 1,
            }
            merged.extend(extraction.records);
        }

        stats.raw_records = merged.len();
        let records = dedup_records(merged);
        stats.unique_records = records.len();

        info!(
            "Extracted '{}': {} record(s), {} unique, {} empty chunk(s), {} failed",
            document.id,
            stats.raw_records,
            stats.unique_records,
            stats.empty_chunks,
            stats.failed_chunks
        );

        Ok(DocumentResult {
            id: document.id.clone(),
            records,
            stats,
        })
    }

    /// Outer error is fatal; inner error degrades the chunk
    fn request(
        &self,
        dialog: &[Message],
        chunk_index: usize,
    ) -> Result<Result<String, String>, ExtractorError> {
        match self.provider.complete(dialog) {
            Ok(response) => {
                debug!("Chunk {}: response length {} chars", chunk_index, response.len());
                Ok(Ok(response))
            }
            Err(e) if e.is_unavailable() => Err(ExtractorError::Provider(e.to_string())),
            Err(e) => {
                warn!("Chunk {}: completion failed, treating as empty: {}", chunk_index, e);
                Ok(Err(e.to_string()))
            }
        }
    }
}

fn failed(chunk_index: usize, reason: String) -> ChunkExtraction {
    ChunkExtraction {
        chunk_index,
        records: Vec::new(),
        outcome: ChunkOutcome::Failed(reason),
    }
}
