//! Generation parameters sent with every completion request

use serde::{Deserialize, Serialize};

/// Stop sequence emitted by Llama-3 style chat templates at end of turn
pub const EOT_STOP: &str = "<|eot_id|>";

/// Decoding knobs owned by a completion provider
///
/// Extraction wants near-deterministic output, so the defaults use a low
/// temperature and stop at the end-of-turn marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationOptions {
    /// Upper bound on tokens generated per request
    pub max_new_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Sequences that end generation
    pub stop: Vec<String>,

    /// Sampling seed, if the service supports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Context window in tokens (prompt plus reply); the service default if unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_window: Option<u32>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            max_new_tokens: 1024,
            temperature: 0.1,
            stop: vec![EOT_STOP.to_string()],
            seed: None,
            context_window: None,
        }
    }
}

impl GenerationOptions {
    /// Validate the options
    pub fn validate(&self) -> Result<(), String> {
        if self.max_new_tokens == 0 {
            return Err("max_new_tokens must be > 0".to_string());
        }

        if !self.temperature.is_finite() || self.temperature < 0.0 {
            return Err("temperature must be a finite, non-negative number".to_string());
        }

        if self.stop.iter().any(|s| s.is_empty()) {
            return Err("stop sequences must not be empty".to_string());
        }

        if let Some(window) = self.context_window {
            if window <= self.max_new_tokens {
                return Err("context_window must be greater than max_new_tokens".to_string());
            }
        }

        Ok(())
    }
}
