//! The cleaning stage: repetition collapse followed by boilerplate stripping

use crate::boilerplate::BoilerplateStripper;
use crate::config::CleanerConfig;
use crate::error::CleanerError;
use crate::repetition::RepetitionCollapser;
use crate::sections::SectionDetector;
use phasemine_domain::Document;
use tracing::debug;

/// Turns a raw OCR document into text ready for chunking
#[derive(Debug, Clone)]
pub struct Cleaner {
    collapser: RepetitionCollapser,
    stripper: BoilerplateStripper,
    config: CleanerConfig,
}

impl Cleaner {
    /// Create a new Cleaner
    pub fn new(config: CleanerConfig) -> Result<Self, CleanerError> {
        config.validate().map_err(CleanerError::Config)?;

        let detector = SectionDetector::with_sections(&config.boilerplate_sections)?;
        Ok(Self {
            collapser: RepetitionCollapser::new(config.repetition_threshold, config.max_phrase_tokens),
            stripper: BoilerplateStripper::new(detector, config.truncate_front_matter),
            config,
        })
    }

    /// Create a Cleaner with default configuration
    pub fn default_config() -> Self {
        Self {
            collapser: RepetitionCollapser::default(),
            stripper: BoilerplateStripper::default(),
            config: CleanerConfig::default(),
        }
    }

    /// Get the active configuration
    pub fn config(&self) -> &CleanerConfig {
        &self.config
    }

    /// Clean raw text
    ///
    /// Repetitions are collapsed first because OCR loops can swallow the
    /// headings the stripper relies on.
    pub fn clean_text(&self, text: &str) -> String {
        let collapsed = self.collapser.collapse(text);
        let stripped = self.stripper.strip(&collapsed);
        debug!(
            "Cleaned text: {} -> {} -> {} bytes",
            text.len(),
            collapsed.len(),
            stripped.len()
        );
        stripped
    }

    /// Clean a document, returning a new one with the same id
    pub fn clean(&self, document: &Document) -> Document {
        document.with_text(self.clean_text(&document.text))
    }
}
