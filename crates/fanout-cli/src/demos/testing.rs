//! Deterministic chat backends for demo tests.

use async_trait::async_trait;
use fanout_core::llm::{ChatCompletionRequest, Completion};
use fanout_core::{AgentError, ChatBackend};

/// Answers `[<model>] <user message>`.
pub struct EchoBackend;

#[async_trait]
impl ChatBackend for EchoBackend {
    async fn complete(&self, request: &ChatCompletionRequest) -> Result<Completion, AgentError> {
        let user = request
            .messages
            .last()
            .map(|m| m.content.as_str())
            .unwrap_or_default();
        Ok(Completion {
            content: format!("[{}] {}", request.model, user),
            model: Some(request.model.clone()),
            usage: None,
        })
    }
}

/// Every call fails as if the endpoint were unreachable.
pub struct FailingBackend;

#[async_trait]
impl ChatBackend for FailingBackend {
    async fn complete(&self, _request: &ChatCompletionRequest) -> Result<Completion, AgentError> {
        Err(AgentError::Transport("connection refused".to_string()))
    }
}

/// Fails only requests whose system prompt starts with `role_prompt_prefix`,
/// echoing everything else like [`EchoBackend`].
pub struct RejectingBackend {
    pub role_prompt_prefix: &'static str,
}

#[async_trait]
impl ChatBackend for RejectingBackend {
    async fn complete(&self, request: &ChatCompletionRequest) -> Result<Completion, AgentError> {
        let rejected = request
            .messages
            .first()
            .is_some_and(|m| m.content.starts_with(self.role_prompt_prefix));
        if rejected {
            return Err(AgentError::Transport("refused".to_string()));
        }
        EchoBackend.complete(request).await
    }
}
