//! Configuration for the Cleaner

use serde::{Deserialize, Serialize};

/// Boilerplate sections removed in addition to References
pub const DEFAULT_BOILERPLATE_SECTIONS: [&str; 8] = [
    "Acknowledgements",
    "Acknowledgments",
    "Conflicts of Interest",
    "Declaration of Competing Interest",
    "Disclosure Statement",
    "Funding",
    "Supporting Information",
    "Author Contributions",
];

/// Configuration for the Cleaner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanerConfig {
    /// Minimum number of consecutive repeats collapsed to one occurrence
    pub repetition_threshold: usize,

    /// Longest phrase (in whitespace-delimited tokens) considered a repeat unit
    pub max_phrase_tokens: usize,

    /// Section headings whose content is removed (References is always removed)
    pub boilerplate_sections: Vec<String>,

    /// Drop front matter (abstract, introduction) when structure allows
    pub truncate_front_matter: bool,

    /// File extension of input documents (without the dot)
    pub extension: String,
}

impl CleanerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.repetition_threshold < 2 {
            return Err("repetition_threshold must be at least 2".to_string());
        }
        if self.max_phrase_tokens == 0 {
            return Err("max_phrase_tokens must be greater than 0".to_string());
        }
        if self.extension.is_empty() || self.extension.starts_with('.') {
            return Err("extension must be non-empty and given without a leading dot".to_string());
        }
        if self.boilerplate_sections.iter().any(|s| s.trim().is_empty()) {
            return Err("boilerplate_sections must not contain empty names".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str)
            .map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            repetition_threshold: 3,
            max_phrase_tokens: 8,
            boilerplate_sections: DEFAULT_BOILERPLATE_SECTIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            truncate_front_matter: true,
            extension: "mmd".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(CleanerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_threshold_below_two_rejected() {
        let config = CleanerConfig {
            repetition_threshold: 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_extension_with_dot_rejected() {
        let config = CleanerConfig {
            extension: ".mmd".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = CleanerConfig::from_toml("repetition_threshold = 4").unwrap();
        assert_eq!(config.repetition_threshold, 4);
        assert_eq!(config.max_phrase_tokens, 8);
        assert!(config.truncate_front_matter);
        assert_eq!(config.boilerplate_sections.len(), DEFAULT_BOILERPLATE_SECTIONS.len());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = CleanerConfig::default();
        let toml_str = config.to_toml().unwrap();
        let parsed = CleanerConfig::from_toml(&toml_str).unwrap();

        assert_eq!(config.repetition_threshold, parsed.repetition_threshold);
        assert_eq!(config.boilerplate_sections, parsed.boilerplate_sections);
        assert_eq!(config.extension, parsed.extension);
    }
}
