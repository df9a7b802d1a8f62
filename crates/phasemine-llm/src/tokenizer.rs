//! Token counters used to size extraction chunks

use crate::LlmError;
use phasemine_domain::TokenCounter;
use std::convert::Infallible;
use std::path::Path;

/// Heuristic token counter
///
/// Approximates one token per `chars_per_token` characters, rounded up. It
/// needs no model files and is close enough for English prose with
/// BPE-style vocabularies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApproxTokenizer {
    chars_per_token: usize,
}

impl ApproxTokenizer {
    /// Create a counter; `chars_per_token` is clamped to at least 1
    pub fn new(chars_per_token: usize) -> Self {
        Self {
            chars_per_token: chars_per_token.max(1),
        }
    }
}

impl Default for ApproxTokenizer {
    fn default() -> Self {
        Self::new(4)
    }
}

impl TokenCounter for ApproxTokenizer {
    type Error = Infallible;

    fn count_tokens(&self, text: &str) -> Result<usize, Self::Error> {
        Ok(text.chars().count().div_ceil(self.chars_per_token))
    }
}

/// Exact token counts from a HuggingFace `tokenizer.json`
#[cfg(feature = "hf-tokenizer")]
pub struct HfTokenizer {
    inner: tokenizers::Tokenizer,
}

#[cfg(feature = "hf-tokenizer")]
impl HfTokenizer {
    /// Load a tokenizer from a `tokenizer.json` file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LlmError> {
        let path = path.as_ref();
        let inner = tokenizers::Tokenizer::from_file(path).map_err(|e| {
            LlmError::Tokenizer(format!("Failed to load {}: {}", path.display(), e))
        })?;
        Ok(Self { inner })
    }
}

#[cfg(feature = "hf-tokenizer")]
impl TokenCounter for HfTokenizer {
    type Error = LlmError;

    fn count_tokens(&self, text: &str) -> Result<usize, Self::Error> {
        self.inner
            .encode(text, false)
            .map(|encoding| encoding.len())
            .map_err(|e| LlmError::Tokenizer(e.to_string()))
    }
}

/// Token counter chosen at runtime
pub enum ModelTokenizer {
    /// Character heuristic
    Approx(ApproxTokenizer),

    /// HuggingFace tokenizer
    #[cfg(feature = "hf-tokenizer")]
    Hf(HfTokenizer),
}

impl ModelTokenizer {
    /// Load the tokenizer at `path`, or fall back to the heuristic when none is given
    pub fn load(path: Option<&Path>) -> Result<Self, LlmError> {
        match path {
            None => Ok(Self::Approx(ApproxTokenizer::default())),
            #[cfg(feature = "hf-tokenizer")]
            Some(path) => Ok(Self::Hf(HfTokenizer::from_file(path)?)),
            #[cfg(not(feature = "hf-tokenizer"))]
            Some(path) => Err(LlmError::Tokenizer(format!(
                "cannot load {}: built without the hf-tokenizer feature",
                path.display()
            ))),
        }
    }

    /// Short description for logs
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Approx(_) => "approximate (chars/4)",
            #[cfg(feature = "hf-tokenizer")]
            Self::Hf(_) => "huggingface",
        }
    }
}

impl TokenCounter for ModelTokenizer {
    type Error = LlmError;

    fn count_tokens(&self, text: &str) -> Result<usize, Self::Error> {
        match self {
            Self::Approx(t) => match t.count_tokens(text) {
                Ok(n) => Ok(n),
                Err(never) => match never {},
            },
            #[cfg(feature = "hf-tokenizer")]
            Self::Hf(t) => t.count_tokens(text),
        }
    }
}
