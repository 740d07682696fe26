//! Domain-level error taxonomy for fanout.

/// Errors produced while building agent rosters and specs.
#[derive(Debug, thiserror::Error)]
pub enum FanoutError {
    #[error("invalid agent spec: {0}")]
    InvalidAgentSpec(String),

    #[error("duplicate agent name: {0}")]
    DuplicateAgent(String),

    #[error("no agents supplied")]
    NoAgents,
}

/// Result type for fanout domain operations.
pub type Result<T> = std::result::Result<T, FanoutError>;
