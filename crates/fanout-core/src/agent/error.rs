//! Error types for a single agent call.

use std::time::Duration;

/// Why one agent failed to produce text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AgentError {
    /// The request never completed (connect, TLS, I/O, client-side timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// The endpoint answered with a non-2xx status.
    #[error("endpoint returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The endpoint answered 2xx but without the expected completion field.
    #[error("malformed completion response: {0}")]
    MalformedResponse(String),

    /// The orchestrator's per-agent timeout elapsed.
    #[error("agent call timed out after {0:?}")]
    Timeout(Duration),

    /// The agent task panicked.
    #[error("agent panicked: {0}")]
    Panicked(String),
}

impl AgentError {
    /// `true` for failures of the remote call itself rather than of its payload.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            AgentError::Transport(_) | AgentError::HttpStatus { .. } | AgentError::Timeout(_)
        )
    }
}

/// Result type for agent calls.
pub type AgentResult<T> = std::result::Result<T, AgentError>;
