//! Completion-service client for QROS.
//!
//! The flows in `qros-core` only see the [`CompletionService`] trait: a prompt
//! goes in, text comes out. [`ChatCompletionsClient`] implements it against
//! any OpenAI-compatible `/chat/completions` endpoint (OpenRouter by default).
//!
//! Every call takes a [`CancellationToken`] and is bounded by a deadline;
//! both surface as distinct error variants (`Cancelled`, `Timeout`).

mod client;
mod wire;

use std::future::Future;

use qros_shared::Result;

pub use client::ChatCompletionsClient;
pub use tokio_util::sync::CancellationToken;

/// A single prompt sent to the completion service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    /// Fully rendered prompt text.
    pub prompt: String,
    /// Ask the service to answer with a single JSON object.
    pub json_output: bool,
}

impl CompletionRequest {
    /// A request expecting a JSON object back.
    pub fn json(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            json_output: true,
        }
    }

    /// A request expecting free text back.
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            json_output: false,
        }
    }
}

/// An external text-completion service.
pub trait CompletionService: Send + Sync {
    /// Send `request` and return the raw reply text.
    ///
    /// Implementations must return `QrosError::Cancelled` promptly once
    /// `cancel` fires.
    fn complete(
        &self,
        request: &CompletionRequest,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<String>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_constructors() {
        assert!(CompletionRequest::json("p").json_output);
        assert!(!CompletionRequest::text("p").json_output);
        assert_eq!(CompletionRequest::text("p").prompt, "p");
    }
}
