//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the pipeline and the two
//! external capabilities it consumes. Implementations live in other crates.

use crate::Message;
use std::fmt::Display;

/// Trait for measuring text length in model tokens
///
/// Implemented by the infrastructure layer (phasemine-llm)
pub trait TokenCounter {
    /// Error type for tokenization
    type Error: Display;

    /// Count the tokens `text` occupies in the model's vocabulary
    fn count_tokens(&self, text: &str) -> Result<usize, Self::Error>;
}

/// Classification of completion-service failures
///
/// An unavailable provider cannot serve any further request (not running,
/// model missing), so continuing the batch is pointless. Every other failure
/// is scoped to the request that produced it.
pub trait ProviderError: Display {
    /// Whether the provider can no longer serve requests at all
    fn is_unavailable(&self) -> bool;
}

/// Trait for generative text completion
///
/// Implemented by the infrastructure layer (phasemine-llm)
pub trait CompletionProvider {
    /// Error type for completion operations
    type Error: ProviderError;

    /// Generate the content of one assistant turn for the given dialog
    fn complete(&self, messages: &[Message]) -> Result<String, Self::Error>;

    /// Identifier of the model serving completions
    fn model_name(&self) -> &str;
}

impl<T: TokenCounter + ?Sized> TokenCounter for &T {
    type Error = T::Error;

    fn count_tokens(&self, text: &str) -> Result<usize, Self::Error> {
        (**self).count_tokens(text)
    }
}

impl<P: CompletionProvider + ?Sized> CompletionProvider for &P {
    type Error = P::Error;

    fn complete(&self, messages: &[Message]) -> Result<String, Self::Error> {
        (**self).complete(messages)
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}
