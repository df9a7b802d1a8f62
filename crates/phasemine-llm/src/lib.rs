//! Phasemine LLM Provider Layer
//!
//! Implementations of the `CompletionProvider` and `TokenCounter` traits from
//! `phasemine-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic scripted provider for testing
//! - `OllamaProvider`: Local Ollama chat API integration
//!
//! # Tokenizers
//!
//! - `ApproxTokenizer`: Character heuristic, no model files needed
//! - `HfTokenizer`: HuggingFace `tokenizer.json` (feature `hf-tokenizer`)
//!
//! # Examples
//!
//! ```
//! use phasemine_domain::{CompletionProvider, Message};
//! use phasemine_llm::MockProvider;
//!
//! let provider = MockProvider::new(r#"[{"Alloy": "AlCoCrFeNi", "Phase": "BCC"}]"#);
//! let result = provider.complete(&[Message::user("test prompt")]).unwrap();
//! assert!(result.contains("AlCoCrFeNi"));
//! ```

#![warn(missing_docs)]

pub mod ollama;
pub mod options;
pub mod tokenizer;

use phasemine_domain::{CompletionProvider, Message, ProviderError, Role};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

pub use ollama::OllamaProvider;
pub use options::GenerationOptions;
#[cfg(feature = "hf-tokenizer")]
pub use tokenizer::HfTokenizer;
pub use tokenizer::{ApproxTokenizer, ModelTokenizer};

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// The service could not be reached
    #[error("Communication error: {0}")]
    Communication(String),

    /// The service answered with a non-success status
    #[error("HTTP {status}: {message}")]
    Http {
        /// Status code
        status: u16,
        /// Response body or context
        message: String,
    },

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Tokenizer could not be loaded or failed to encode
    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    /// The blocking runtime could not be created
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

impl ProviderError for LlmError {
    fn is_unavailable(&self) -> bool {
        matches!(
            self,
            LlmError::Communication(_) | LlmError::ModelNotAvailable(_) | LlmError::Runtime(_)
        )
    }
}

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Fail,
    Unavailable,
}

/// Mock LLM provider for deterministic testing
///
/// Replies are chosen in this order:
///
/// 1. The first registered `needle` found in the last user message
/// 2. The next queued response
/// 3. The default response
///
/// # Examples
///
/// ```
/// use phasemine_domain::{CompletionProvider, Message};
/// use phasemine_llm::MockProvider;
///
/// let mut provider = MockProvider::default();
/// provider.add_response("CoCrFeMnNi", r#"{"Alloy": "CoCrFeMnNi", "Phase": "FCC"}"#);
/// provider.push_response("first queued");
///
/// let reply = provider.complete(&[Message::user("... CoCrFeMnNi ...")]).unwrap();
/// assert!(reply.contains("FCC"));
/// assert_eq!(provider.complete(&[Message::user("other")]).unwrap(), "first queued");
/// assert_eq!(provider.complete(&[Message::user("other")]).unwrap(), "[]");
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    model: String,
    default_response: String,
    responses: Arc<Mutex<Vec<(String, MockReply)>>>,
    queue: Arc<Mutex<VecDeque<String>>>,
    call_count: Arc<Mutex<usize>>,
    dialogs: Arc<Mutex<Vec<Vec<Message>>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            model: "mock".to_string(),
            default_response: response.into(),
            responses: Arc::new(Mutex::new(Vec::new())),
            queue: Arc::new(Mutex::new(VecDeque::new())),
            call_count: Arc::new(Mutex::new(0)),
            dialogs: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set the reported model name
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Reply with `response` whenever the last user message contains `needle`
    pub fn add_response(&mut self, needle: impl Into<String>, response: impl Into<String>) {
        lock(&self.responses).push((needle.into(), MockReply::Text(response.into())));
    }

    /// Fail with a request-scoped error whenever the last user message contains `needle`
    pub fn add_error(&mut self, needle: impl Into<String>) {
        lock(&self.responses).push((needle.into(), MockReply::Fail));
    }

    /// Fail as if the service went away whenever the last user message contains `needle`
    pub fn add_unavailable(&mut self, needle: impl Into<String>) {
        lock(&self.responses).push((needle.into(), MockReply::Unavailable));
    }

    /// Queue a response for the next call no needle matches
    pub fn push_response(&self, response: impl Into<String>) {
        lock(&self.queue).push_back(response.into());
    }

    /// Get the number of times complete was called
    pub fn call_count(&self) -> usize {
        *lock(&self.call_count)
    }

    /// Reset the call count and recorded dialogs
    pub fn reset(&self) {
        *lock(&self.call_count) = 0;
        lock(&self.dialogs).clear();
    }

    /// Every dialog received, in call order
    pub fn dialogs(&self) -> Vec<Vec<Message>> {
        lock(&self.dialogs).clone()
    }

    fn reply_for(&self, messages: &[Message]) -> MockReply {
        let last_user = messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .unwrap_or("");

        let matched = lock(&self.responses)
            .iter()
            .find(|(needle, _)| last_user.contains(needle.as_str()))
            .map(|(_, reply)| reply.clone());

        matched
            .or_else(|| lock(&self.queue).pop_front().map(MockReply::Text))
            .unwrap_or_else(|| MockReply::Text(self.default_response.clone()))
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("[]")
    }
}

impl CompletionProvider for MockProvider {
    type Error = LlmError;

    fn complete(&self, messages: &[Message]) -> Result<String, Self::Error> {
        *lock(&self.call_count) += 1;
        lock(&self.dialogs).push(messages.to_vec());

        match self.reply_for(messages) {
            MockReply::Text(text) => Ok(text),
            MockReply::Fail => Err(LlmError::InvalidResponse("Mock error".to_string())),
            MockReply::Unavailable => Err(LlmError::ModelNotAvailable(self.model.clone())),
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
