//! OpenAI-compatible chat-completion request/response bodies.

use serde::{Deserialize, Serialize};

use crate::agent::error::AgentError;
use crate::domain::AgentSpec;

/// Role tag on a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Body of `POST {base}/chat/completions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub temperature: f32,
    pub messages: Vec<ChatMessage>,
}

impl ChatCompletionRequest {
    /// One-shot request: the spec's role prompt as system, `user_content` as user.
    pub fn for_agent(spec: &AgentSpec, user_content: impl Into<String>) -> Self {
        Self {
            model: spec.model_id().to_string(),
            temperature: spec.temperature(),
            messages: vec![
                ChatMessage::system(spec.role_prompt()),
                ChatMessage::user(user_content),
            ],
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub usage: Option<TokenUsage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    #[serde(default)]
    pub message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

/// The text produced by one completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub content: String,
    pub model: Option<String>,
    pub usage: Option<TokenUsage>,
}

impl ChatCompletionResponse {
    /// Extract `choices[0].message.content`.
    pub fn into_completion(self) -> Result<Completion, AgentError> {
        let content = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::MalformedResponse("response has no choices".to_string()))?
            .message
            .and_then(|m| m.content)
            .ok_or_else(|| {
                AgentError::MalformedResponse("first choice has no message content".to_string())
            })?;

        Ok(Completion {
            content,
            model: self.model,
            usage: self.usage,
        })
    }
}
