//! Configuration for extraction

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::prompt::RefinementPass;

/// Per-chunk extraction behaviour
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Follow-up prompts applied to each chunk's answer, in order
    pub refinement_passes: Vec<RefinementPass>,

    /// Drop records whose fields are missing or outside the phase vocabulary
    pub strict_records: bool,
}

impl ExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        for (i, pass) in self.refinement_passes.iter().enumerate() {
            if self.refinement_passes[..i].contains(pass) {
                return Err(format!("refinement pass '{}' listed twice", pass));
            }
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

/// Model weight quantization the completion service runs with
///
/// Only used to label the results directory; the service itself owns the
/// precision setup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quantization {
    /// Full precision
    #[default]
    #[serde(rename = "none", alias = "")]
    None,

    /// 4-bit weights
    #[serde(rename = "4bit")]
    FourBit,

    /// 8-bit weights
    #[serde(rename = "8bit")]
    EightBit,
}

impl Quantization {
    /// Tag used in results directory names (empty for full precision)
    pub fn dir_tag(&self) -> &'static str {
        match self {
            Quantization::None => "",
            Quantization::FourBit => "4bit",
            Quantization::EightBit => "8bit",
        }
    }
}

impl fmt::Display for Quantization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantization::None => f.write_str("none"),
            other => f.write_str(other.dir_tag()),
        }
    }
}

impl FromStr for Quantization {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(Quantization::None),
            "4bit" => Ok(Quantization::FourBit),
            "8bit" => Ok(Quantization::EightBit),
            other => Err(format!("unknown quantization '{}' (expected none, 4bit or 8bit)", other)),
        }
    }
}

/// Everything a batch extraction run needs, passed in explicitly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory holding cleaned documents
    pub input_dir: PathBuf,

    /// Root under which the scoped results directory is created
    pub output_dir: PathBuf,

    /// Model identifier, possibly with an organisation prefix
    pub model: String,

    /// Token budget per chunk
    pub max_chunk_length: usize,

    /// Quantization label
    pub quantization: Quantization,

    /// Document file extension, without the dot
    pub extension: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("papers/cleaned"),
            output_dir: PathBuf::from("papers/output"),
            model: "llama3.2:3b".to_string(),
            max_chunk_length: 120_000,
            quantization: Quantization::None,
            extension: "mmd".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_chunk_length == 0 {
            return Err("max_chunk_length must be greater than 0".to_string());
        }
        if self.model_basename().is_empty() {
            return Err("model must not be empty".to_string());
        }
        if self.extension.is_empty() || self.extension.starts_with('.') {
            return Err("extension must be non-empty and given without a leading dot".to_string());
        }
        Ok(())
    }

    /// Last path segment of the model identifier
    pub fn model_basename(&self) -> &str {
        self.model.rsplit('/').next().unwrap_or_default().trim()
    }

    /// `{output}/{model-basename}-{quantization}-{max_chunk_length}`
    pub fn results_dir(&self) -> PathBuf {
        self.output_dir.join(format!(
            "{}-{}-{}",
            self.model_basename(),
            self.quantization.dir_tag(),
            self.max_chunk_length
        ))
    }

    /// Path of the input document with the given stem
    pub fn document_path(&self, stem: &str) -> PathBuf {
        self.input_dir.join(format!("{}.{}", stem, self.extension))
    }

    /// Builder-style override of the input directory
    pub fn with_input_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.input_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Builder-style override of the output directory
    pub fn with_output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.output_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs_are_valid() {
        assert!(ExtractorConfig::default().validate().is_ok());
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_duplicate_pass_rejected() {
        let config = ExtractorConfig {
            refinement_passes: vec![
                RefinementPass::PhaseNormalization,
                RefinementPass::PhaseNormalization,
            ],
            strict_records: false,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_results_dir_naming() {
        let config = PipelineConfig {
            output_dir: PathBuf::from("out"),
            model: "meta-llama/Llama-3.2-3B-Instruct".to_string(),
            max_chunk_length: 120_000,
            quantization: Quantization::FourBit,
            ..Default::default()
        };
        assert_eq!(
            config.results_dir(),
            PathBuf::from("out/Llama-3.2-3B-Instruct-4bit-120000")
        );

        let unquantized = PipelineConfig {
            quantization: Quantization::None,
            ..config
        };
        assert_eq!(
            unquantized.results_dir(),
            PathBuf::from("out/Llama-3.2-3B-Instruct--120000")
        );
    }

    #[test]
    fn test_document_path() {
        let config = PipelineConfig::default().with_input_dir("in");
        assert_eq!(config.document_path("p1"), PathBuf::from("in/p1.mmd"));
    }

    #[test]
    fn test_invalid_pipeline_configs() {
        let zero = PipelineConfig {
            max_chunk_length: 0,
            ..Default::default()
        };
        assert!(zero.validate().is_err());

        let no_model = PipelineConfig {
            model: "org/".to_string(),
            ..Default::default()
        };
        assert!(no_model.validate().is_err());

        let dotted = PipelineConfig {
            extension: ".mmd".to_string(),
            ..Default::default()
        };
        assert!(dotted.validate().is_err());
    }

    #[test]
    fn test_quantization_parsing() {
        assert_eq!("".parse::<Quantization>().unwrap(), Quantization::None);
        assert_eq!("4BIT".parse::<Quantization>().unwrap(), Quantization::FourBit);
        assert_eq!(Quantization::EightBit.to_string(), "8bit");
        assert_eq!(Quantization::None.to_string(), "none");
        assert!("2bit".parse::<Quantization>().is_err());
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = ExtractorConfig {
            refinement_passes: vec![
                RefinementPass::CompositionCheck,
                RefinementPass::PhaseNormalization,
            ],
            strict_records: true,
        };
        let toml_str = config.to_toml().unwrap();
        assert!(toml_str.contains("phase-normalization"));
        assert_eq!(ExtractorConfig::from_toml(&toml_str).unwrap(), config);

        let pipeline = PipelineConfig {
            quantization: Quantization::EightBit,
            ..Default::default()
        };
        let parsed = PipelineConfig::from_toml(&pipeline.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, pipeline);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed = PipelineConfig::from_toml("model = \"mistral\"\nquantization = \"\"").unwrap();
        assert_eq!(parsed.model, "mistral");
        assert_eq!(parsed.quantization, Quantization::None);
        assert_eq!(parsed.max_chunk_length, 120_000);
    }
}
