//! HTTP client for OpenAI-compatible chat completion endpoints.

use std::time::{Duration, Instant};

use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};
use url::Url;

use qros_shared::{LlmConfig, QrosError, Result};

use crate::wire::{ChatMessage, ChatRequest, ChatResponse, ErrorEnvelope, ResponseFormat};
use crate::{CompletionRequest, CompletionService};

/// User-Agent string for completion requests.
const USER_AGENT: &str = concat!("qros/", env!("CARGO_PKG_VERSION"));

/// Connection establishment limit, separate from the overall deadline.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Longest slice of an error body copied into an error message.
const MAX_ERROR_PREVIEW: usize = 300;

/// Client for `POST {base_url}/chat/completions`.
#[derive(Debug, Clone)]
pub struct ChatCompletionsClient {
    http: Client,
    endpoint: String,
    api_key: String,
    model: String,
    timeout: Duration,
}

impl ChatCompletionsClient {
    /// Build a client from explicit parts.
    pub fn new(
        base_url: &Url,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| QrosError::Network(format!("failed to build HTTP client: {e}")))?;

        let endpoint = format!(
            "{}/chat/completions",
            base_url.as_str().trim_end_matches('/')
        );

        Ok(Self {
            http,
            endpoint,
            api_key: api_key.into(),
            model: model.into(),
            timeout,
        })
    }

    /// Build a client from the `[llm]` config section.
    pub fn from_config(config: &LlmConfig, api_key: impl Into<String>) -> Result<Self> {
        Self::new(
            &config.parsed_base_url()?,
            api_key,
            config.model.clone(),
            config.timeout(),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// One request/response exchange, without deadline or cancellation.
    async fn send(&self, request: &CompletionRequest) -> Result<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            response_format: request.json_output.then(ResponseFormat::json_object),
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| QrosError::Network(format!("{}: {e}", self.endpoint)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(QrosError::Completion(format!(
                "HTTP {status}: {}",
                error_message(&text)
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| QrosError::Completion(format!("unreadable response body: {e}")))?;

        if let Some(usage) = &parsed.usage {
            debug!(
                model = parsed.model.as_deref().unwrap_or(&self.model),
                tokens_in = usage.prompt_tokens,
                tokens_out = usage.completion_tokens,
                "completion usage"
            );
        }

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| QrosError::Completion("response contained no message content".into()))
    }
}

impl CompletionService for ChatCompletionsClient {
    #[instrument(skip_all, fields(model = %self.model, json = request.json_output))]
    async fn complete(
        &self,
        request: &CompletionRequest,
        cancel: &CancellationToken,
    ) -> Result<String> {
        let start = Instant::now();

        let text = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(QrosError::Cancelled),
            outcome = tokio::time::timeout(self.timeout, self.send(request)) => match outcome {
                Ok(result) => result?,
                Err(_) => return Err(QrosError::Timeout { after: self.timeout }),
            },
        };

        info!(
            latency_ms = start.elapsed().as_millis() as u64,
            chars = text.len(),
            "completion received"
        );
        Ok(text)
    }
}

/// Pull a readable message out of an error response body.
fn error_message(body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        return envelope.error.message;
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".into();
    }
    trimmed.chars().take(MAX_ERROR_PREVIEW).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, timeout: Duration) -> ChatCompletionsClient {
        let base = Url::parse(&format!("{}/api/v1", server.uri())).unwrap();
        ChatCompletionsClient::new(&base, "test-key", "test/model", timeout).unwrap()
    }

    fn ok_body(content: &str) -> serde_json::Value {
        serde_json::json!({
            "model": "test/model",
            "choices": [{ "message": { "role": "assistant", "content": content } }],
            "usage": { "prompt_tokens": 12, "completion_tokens": 3 }
        })
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let base = Url::parse("https://openrouter.ai/api/v1/").unwrap();
        let client =
            ChatCompletionsClient::new(&base, "k", "m", Duration::from_secs(1)).unwrap();
        assert_eq!(
            client.endpoint(),
            "https://openrouter.ai/api/v1/chat/completions"
        );
    }

    #[test]
    fn error_message_prefers_json_envelope() {
        assert_eq!(
            error_message(r#"{"error":{"message":"rate limited","code":429}}"#),
            "rate limited"
        );
        assert_eq!(error_message("  plain failure "), "plain failure");
        assert_eq!(error_message(""), "empty response body");
    }

    #[tokio::test]
    async fn complete_returns_message_content() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(serde_json::json!({
                "model": "test/model",
                "response_format": { "type": "json_object" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(r#"{"issues":[]}"#)))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_secs(5));
        let text = client
            .complete(
                &CompletionRequest::json("analyze this"),
                &CancellationToken::new(),
            )
            .await
            .unwrap();
        assert_eq!(text, r#"{"issues":[]}"#);
    }

    #[tokio::test]
    async fn http_error_becomes_completion_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": { "message": "rate limited" }
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_secs(5));
        let err = client
            .complete(&CompletionRequest::text("hi"), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, QrosError::Completion(_)));
        let msg = err.to_string();
        assert!(msg.contains("429"));
        assert!(msg.contains("rate limited"));
    }

    #[tokio::test]
    async fn empty_choices_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "choices": [] })),
            )
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_secs(5));
        let err = client
            .complete(&CompletionRequest::text("hi"), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, QrosError::Completion(_)));
    }

    #[tokio::test]
    async fn slow_response_times_out() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(ok_body("late"))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_millis(100));
        let err = client
            .complete(&CompletionRequest::text("hi"), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, QrosError::Timeout { .. }));
    }

    #[tokio::test]
    async fn cancellation_interrupts_pending_call() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(ok_body("late"))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_secs(30));
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let err = client
            .complete(&CompletionRequest::text("hi"), &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, QrosError::Cancelled));
    }

    #[tokio::test]
    async fn already_cancelled_token_short_circuits() {
        let server = MockServer::start().await;
        let client = client_for(&server, Duration::from_secs(5));

        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = client
            .complete(&CompletionRequest::text("hi"), &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, QrosError::Cancelled));
    }
}
