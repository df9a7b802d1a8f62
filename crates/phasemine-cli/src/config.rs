//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use phasemine_cleaner::CleanerConfig;
use phasemine_extractor::{ExtractorConfig, PipelineConfig};
use phasemine_llm::ollama::{DEFAULT_ENDPOINT, DEFAULT_MAX_ATTEMPTS};
use phasemine_llm::GenerationOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// CLI configuration.
///
/// Every section is optional in the file; missing values take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Cleaning stage
    #[serde(default)]
    pub clean: CleanSection,

    /// Per-chunk extraction behaviour
    #[serde(default)]
    pub extract: ExtractorConfig,

    /// Batch extraction paths and identity
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Completion service
    #[serde(default)]
    pub llm: LlmSection,
}

/// Global CLI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
}

/// `[clean]` section: raw input location plus cleaner settings.
///
/// Cleaned documents are written to `pipeline.input_dir`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanSection {
    /// Directory of raw OCR documents
    #[serde(default = "default_raw_dir")]
    pub raw_dir: PathBuf,

    /// Cleaner settings
    #[serde(flatten)]
    pub cleaner: CleanerConfig,
}

/// `[llm]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmSection {
    /// Ollama endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Optional HuggingFace tokenizer.json for exact chunk sizing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokenizer: Option<PathBuf>,

    /// Per-request timeout in seconds; unset means no timeout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Attempts per request when the transport fails (1 = no retry)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Decoding options
    #[serde(flatten)]
    pub generation: GenerationOptions,
}

impl Config {
    /// Get the default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".phasemine").join("config.toml"))
    }

    /// Resolve an explicit path or fall back to the default one.
    pub fn resolve_path(path: Option<&Path>) -> Result<PathBuf> {
        match path {
            Some(path) => Ok(path.to_path_buf()),
            None => Self::default_path(),
        }
    }

    /// Load configuration from file, or defaults if the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.clean
            .cleaner
            .validate()
            .and_then(|_| self.extract.validate())
            .and_then(|_| self.pipeline.validate())
            .and_then(|_| self.llm.generation.validate())
            .map_err(CliError::Config)?;

        if self.llm.max_attempts == 0 {
            return Err(CliError::Config("llm.max_attempts must be at least 1".into()));
        }
        if self.clean.cleaner.extension != self.pipeline.extension {
            return Err(CliError::Config(format!(
                "clean.extension ({}) and pipeline.extension ({}) must match",
                self.clean.cleaner.extension, self.pipeline.extension
            )));
        }
        Ok(())
    }
}

impl LlmSection {
    /// Request timeout, if configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

impl Default for CleanSection {
    fn default() -> Self {
        Self {
            raw_dir: default_raw_dir(),
            cleaner: CleanerConfig::default(),
        }
    }
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            tokenizer: None,
            timeout_secs: None,
            max_attempts: default_max_attempts(),
            generation: GenerationOptions::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_raw_dir() -> PathBuf {
    PathBuf::from("papers/raw")
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}
