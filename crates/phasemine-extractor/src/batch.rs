//! Batch extraction over a directory of cleaned documents

use crate::config::{ExtractorConfig, PipelineConfig};
use crate::error::ExtractorError;
use crate::extractor::Extractor;
use crate::types::{DocumentStats, Record};
use phasemine_domain::{CompletionProvider, Document, TokenCounter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Outcome of a batch run
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    /// Directory the results were written to
    pub results_dir: PathBuf,

    /// Per-document counters, in processing order
    pub documents: Vec<DocumentStats>,

    /// Stems of documents that could not be read
    pub skipped: Vec<String>,
}

impl BatchSummary {
    /// Total records written across all documents
    pub fn records_written(&self) -> usize {
        self.documents.iter().map(|d| d.unique_records).sum()
    }
}

/// Runs extraction over every document named by a [`PipelineConfig`]
pub struct Pipeline<L, T> {
    extractor: Extractor<L, T>,
    config: PipelineConfig,
}

impl<L, T> Pipeline<L, T>
where
    L: CompletionProvider,
    T: TokenCounter,
{
    /// Create a pipeline; the chunk budget comes from `config`
    pub fn new(
        provider: L,
        tokenizer: T,
        config: PipelineConfig,
        options: ExtractorConfig,
    ) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;
        let extractor = Extractor::new(provider, tokenizer, config.max_chunk_length, options)?;
        Ok(Self { extractor, config })
    }

    /// Process every document in sorted stem order
    ///
    /// Each document's result is written before the next one starts. A
    /// document that vanished or cannot be decoded is skipped with a warning.
    pub fn run(&self) -> Result<BatchSummary, ExtractorError> {
        let results_dir = self.config.results_dir();
        fs::create_dir_all(&results_dir)?;
        info!("Results will be saved in {}", results_dir.display());

        let stems = document_stems(&self.config.input_dir, &self.config.extension)?;
        info!("{} document(s) to process", stems.len());

        let mut summary = BatchSummary {
            results_dir,
            ..Default::default()
        };

        for stem in stems {
            let Some(document) = self.load(&stem) else {
                summary.skipped.push(stem);
                continue;
            };

            let result = self.extractor.extract_document(&document)?;
            write_records(&summary.results_dir.join(&result.id), &result.records)?;
            summary.documents.push(result.stats);
        }

        info!(
            "Batch complete: {} document(s), {} record(s), {} skipped",
            summary.documents.len(),
            summary.records_written(),
            summary.skipped.len()
        );
        Ok(summary)
    }
}

impl<L, T> Pipeline<L, T> {
    /// Read the document named by `stem`; `None` if it vanished or cannot be decoded
    fn load(&self, stem: &str) -> Option<Document> {
        let path = self.config.document_path(stem);
        match fs::read_to_string(&path) {
            Ok(text) => Some(Document::new(stem, text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!("File not found: {}", path.display());
                None
            }
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                None
            }
        }
    }
}

/// Stems of the files in `dir` carrying `extension`, sorted
pub fn document_stems(dir: &Path, extension: &str) -> io::Result<Vec<String>> {
    let mut stems: Vec<String> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == extension))
        .filter_map(|path| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .collect();
    stems.sort();
    Ok(stems)
}

/// Write records as a pretty-printed JSON array
pub fn write_records(path: &Path, records: &[Record]) -> Result<(), ExtractorError> {
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::test_support::WordCounter;
    use phasemine_llm::MockProvider;
    use tempfile::TempDir;

    fn pipeline_config(input: &Path, output: &Path) -> PipelineConfig {
        PipelineConfig {
            input_dir: input.to_path_buf(),
            output_dir: output.to_path_buf(),
            model: "org/test-model".to_string(),
            max_chunk_length: 50,
            ..Default::default()
        }
    }

    #[test]
    fn test_document_stems_sorted() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.mmd"), "").unwrap();
        fs::write(dir.path().join("a.mmd"), "").unwrap();
        fs::write(dir.path().join("c.txt"), "").unwrap();
        assert_eq!(document_stems(dir.path(), "mmd").unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_run_writes_one_file_per_document() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        fs::write(input.path().join("p1.mmd"), "CoCrNi is FCC").unwrap();
        fs::write(input.path().join("p2.mmd"), "nothing here").unwrap();

        let mut provider = MockProvider::default();
        provider.add_response("CoCrNi", r#"{"Alloy":"CoCrNi","Phase":"FCC"}"#);

        let config = pipeline_config(input.path(), output.path());
        let pipeline =
            Pipeline::new(&provider, WordCounter, config, ExtractorConfig::default()).unwrap();
        let summary = pipeline.run().unwrap();

        let results = output.path().join("test-model--50");
        assert_eq!(summary.results_dir, results);
        assert_eq!(summary.documents.len(), 2);
        assert_eq!(summary.records_written(), 1);

        let p1 = fs::read_to_string(results.join("p1")).unwrap();
        assert_eq!(p1, "[\n  {\n    \"Alloy\": \"CoCrNi\",\n    \"Phase\": \"FCC\"\n  }\n]");
        assert_eq!(fs::read_to_string(results.join("p2")).unwrap(), "[]");
    }

    #[test]
    fn test_missing_input_dir_is_error() {
        let output = TempDir::new().unwrap();
        let provider = MockProvider::default();
        let config = pipeline_config(&output.path().join("missing"), output.path());
        let pipeline =
            Pipeline::new(&provider, WordCounter, config, ExtractorConfig::default()).unwrap();
        assert!(matches!(pipeline.run(), Err(ExtractorError::Io(_))));
    }

    #[test]
    fn test_undecodable_document_skipped() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        fs::write(input.path().join("bad.mmd"), [0xff, 0xfe]).unwrap();
        fs::write(input.path().join("good.mmd"), "text").unwrap();

        let provider = MockProvider::default();
        let config = pipeline_config(input.path(), output.path());
        let pipeline =
            Pipeline::new(&provider, WordCounter, config, ExtractorConfig::default()).unwrap();
        let summary = pipeline.run().unwrap();

        assert_eq!(summary.skipped, vec!["bad"]);
        assert_eq!(summary.documents.len(), 1);
        assert!(!summary.results_dir.join("bad").exists());
    }

    #[test]
    fn test_vanished_document_skipped() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        fs::write(input.path().join("present.mmd"), "text").unwrap();

        let provider = MockProvider::default();
        let config = pipeline_config(input.path(), output.path());
        let pipeline =
            Pipeline::new(&provider, WordCounter, config, ExtractorConfig::default()).unwrap();

        let present = pipeline.load("present").unwrap();
        assert_eq!(present, Document::new("present", "text"));
        assert!(pipeline.load("listed-then-deleted").is_none());
        assert_eq!(provider.call_count(), 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let provider = MockProvider::default();
        let config = PipelineConfig {
            max_chunk_length: 0,
            ..Default::default()
        };
        let result = Pipeline::new(&provider, WordCounter, config, ExtractorConfig::default());
        assert!(matches!(result, Err(ExtractorError::Config(_))));
    }
}
