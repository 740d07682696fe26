//! Chat-completion backend trait and its reqwest implementation.

use async_trait::async_trait;
use tracing::{debug, instrument};

use super::config::{ConfigError, LlmConfig};
use super::wire::{ChatCompletionRequest, ChatCompletionResponse, Completion};
use crate::agent::error::AgentError;

/// Upper bound on how much of an error body is kept in `HttpStatus`.
const MAX_ERROR_BODY_CHARS: usize = 2_000;

/// Anything that can answer one chat-completion request.
///
/// Production code uses [`HttpChatBackend`]; tests inject a deterministic stub.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(&self, request: &ChatCompletionRequest) -> Result<Completion, AgentError>;
}

/// Chat-completion client speaking the OpenAI wire format over HTTPS.
pub struct HttpChatBackend {
    config: LlmConfig,
    http_client: reqwest::Client,
}

impl HttpChatBackend {
    pub fn new(config: LlmConfig) -> Result<Self, ConfigError> {
        let http_client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Create client from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(LlmConfig::from_env()?)
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn complete(&self, request: &ChatCompletionRequest) -> Result<Completion, AgentError> {
        debug!(messages = request.messages.len(), "sending chat completion request");

        let response = self
            .http_client
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::HttpStatus {
                status: status.as_u16(),
                body: crate::domain::preview(body.trim(), MAX_ERROR_BODY_CHARS),
            });
        }

        let body = response.bytes().await.map_err(transport_error)?;
        let parsed: ChatCompletionResponse = serde_json::from_slice(&body)
            .map_err(|e| AgentError::MalformedResponse(format!("invalid JSON body: {e}")))?;

        let completion = parsed.into_completion()?;
        debug!(
            bytes = completion.content.len(),
            total_tokens = completion.usage.map(|u| u.total_tokens).unwrap_or(0),
            "chat completion received"
        );
        Ok(completion)
    }
}

fn transport_error(err: reqwest::Error) -> AgentError {
    if err.is_timeout() {
        AgentError::Transport(format!("request timed out: {err}"))
    } else {
        AgentError::Transport(err.to_string())
    }
}
