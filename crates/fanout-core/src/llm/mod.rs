//! Transport to an OpenAI-compatible chat-completion endpoint.
//!
//! # Module layout
//!
//! - [`config`]: `LlmConfig`, `ConfigError`
//! - [`wire`]: request/response bodies and completion extraction
//! - [`backend`]: `ChatBackend` trait, `HttpChatBackend`

pub mod backend;
pub mod config;
pub mod wire;

pub use backend::{ChatBackend, HttpChatBackend};
pub use config::{ConfigError, LlmConfig};
pub use wire::{ChatCompletionRequest, ChatMessage, ChatRole, Completion, TokenUsage};
