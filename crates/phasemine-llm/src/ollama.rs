//! Ollama Provider Implementation
//!
//! Talks to a local Ollama instance through its chat API.
//!
//! # Features
//!
//! - Chat-style requests (`/api/chat`) carrying the full dialog
//! - Generation options forwarded as Ollama `options`, including `num_ctx`
//! - Optional retry with exponential backoff on transport failures
//! - A private current-thread runtime, so callers stay synchronous
//!
//! # Examples
//!
//! ```no_run
//! use phasemine_domain::{CompletionProvider, Message};
//! use phasemine_llm::OllamaProvider;
//!
//! let provider = OllamaProvider::new("http://localhost:11434", "llama3").unwrap();
//! let answer = provider.complete(&[Message::user("Say hello")]).unwrap();
//! println!("{}", answer);
//! ```

use crate::options::GenerationOptions;
use crate::LlmError;
use phasemine_domain::{CompletionProvider, Message};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::{debug, warn};

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default number of attempts per request (no retries)
pub const DEFAULT_MAX_ATTEMPTS: u32 = 1;

/// Ollama API provider for local LLM inference
pub struct OllamaProvider {
    endpoint: String,
    model: String,
    options: GenerationOptions,
    client: reqwest::Client,
    runtime: Runtime,
    timeout: Option<Duration>,
    max_attempts: u32,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    options: RequestOptions<'a>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct RequestOptions<'a> {
    num_predict: u32,
    temperature: f32,
    stop: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_ctx: Option<u32>,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(Deserialize)]
struct TagEntry {
    name: String,
}

impl OllamaProvider {
    /// Create a new Ollama provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint (e.g., "http://localhost:11434")
    /// - `model`: Model to use (e.g., "llama3", "mistral")
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client or the runtime cannot be built.
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| LlmError::Communication(format!("Failed to build HTTP client: {}", e)))?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| LlmError::Runtime(e.to_string()))?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            options: GenerationOptions::default(),
            client,
            runtime,
            timeout: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        })
    }

    /// Create a provider against `http://localhost:11434`
    pub fn default_endpoint(model: impl Into<String>) -> Result<Self, LlmError> {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// Set the generation options
    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    /// Set a per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the number of attempts made when the transport fails
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Active generation options
    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    /// Send a dialog to `/api/chat` and return the assistant content
    ///
    /// # Errors
    ///
    /// - `Communication` if Ollama cannot be reached
    /// - `ModelNotAvailable` if Ollama does not know the model
    /// - `Http` for any other non-success status
    /// - `InvalidResponse` if the body is not a chat response
    pub async fn chat(&self, messages: &[Message]) -> Result<String, LlmError> {
        let url = format!("{}/api/chat", self.endpoint);
        let body = self.request_body(messages);

        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_attempts {
            let mut request = self.client.post(&url).json(&body);
            if let Some(timeout) = self.timeout {
                request = request.timeout(timeout);
            }

            match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let parsed = response.json::<ChatResponse>().await.map_err(|e| {
                            LlmError::InvalidResponse(format!("Failed to parse response: {}", e))
                        })?;
                        debug!("Ollama returned {} chars", parsed.message.content.len());
                        return Ok(parsed.message.content);
                    }

                    if status == reqwest::StatusCode::NOT_FOUND {
                        return Err(LlmError::ModelNotAvailable(self.model.clone()));
                    }

                    let message = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    return Err(LlmError::Http {
                        status: status.as_u16(),
                        message,
                    });
                }
                Err(e) => {
                    warn!("Request to {} failed: {}", url, e);
                    last_error = Some(LlmError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_attempts {
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| LlmError::Communication("Max attempts exceeded".to_string())))
    }

    /// Check that Ollama is reachable and has the configured model pulled
    pub async fn check_model(&self) -> Result<(), LlmError> {
        let url = format!("{}/api/tags", self.endpoint);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(LlmError::Http {
                status: response.status().as_u16(),
                message: format!("GET {}", url),
            });
        }

        let tags = response
            .json::<TagsResponse>()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse model list: {}", e)))?;

        if tags.models.iter().any(|m| model_matches(&self.model, &m.name)) {
            Ok(())
        } else {
            Err(LlmError::ModelNotAvailable(self.model.clone()))
        }
    }

    /// Blocking form of [`check_model`](Self::check_model)
    pub fn ensure_model_available(&self) -> Result<(), LlmError> {
        self.runtime.block_on(self.check_model())
    }

    fn request_body<'a>(&'a self, messages: &'a [Message]) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: messages
                .iter()
                .map(|m| ChatMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            stream: false,
            options: RequestOptions {
                num_predict: self.options.max_new_tokens,
                temperature: self.options.temperature,
                stop: &self.options.stop,
                seed: self.options.seed,
                num_ctx: self.options.context_window,
            },
        }
    }
}

/// Ollama lists untagged pulls as `name:latest`
fn model_matches(wanted: &str, listed: &str) -> bool {
    listed == wanted
        || (!wanted.contains(':') && listed.strip_suffix(":latest") == Some(wanted))
}

impl CompletionProvider for OllamaProvider {
    type Error = LlmError;

    fn complete(&self, messages: &[Message]) -> Result<String, Self::Error> {
        self.runtime.block_on(self.chat(messages))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
