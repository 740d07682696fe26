//! Error types for orchestration.

use std::time::Duration;

use crate::agent::AgentError;
use crate::domain::FanoutError;

/// One agent's failure, keyed by agent name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentFailure {
    pub agent: String,
    pub error: AgentError,
}

impl std::fmt::Display for AgentFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.agent, self.error)
    }
}

/// Errors produced by the orchestration layer.
#[derive(Debug, thiserror::Error)]
pub enum OrchestrationError {
    #[error(transparent)]
    Domain(#[from] FanoutError),

    #[error("invalid orchestrator config: {0}")]
    InvalidConfig(String),

    #[error("agent run failed: {}", format_failures(.failures))]
    AgentsFailed { failures: Vec<AgentFailure> },

    #[error("synthesis agent {agent} failed")]
    Synthesis { agent: String, source: AgentError },

    #[error("pipeline stage {index} ({agent}) failed")]
    StageFailed {
        index: usize,
        agent: String,
        source: AgentError,
    },

    #[error("pipeline has no stages")]
    EmptyPipeline,

    #[error("run exceeded its deadline of {0:?}")]
    DeadlineExceeded(Duration),

    #[error("agent task could not be joined: {0}")]
    Join(String),
}

impl OrchestrationError {
    /// Names of the agents responsible for this error, if any.
    pub fn failed_agents(&self) -> Vec<&str> {
        match self {
            OrchestrationError::AgentsFailed { failures } => {
                failures.iter().map(|f| f.agent.as_str()).collect()
            }
            OrchestrationError::Synthesis { agent, .. }
            | OrchestrationError::StageFailed { agent, .. } => vec![agent.as_str()],
            _ => Vec::new(),
        }
    }
}

fn format_failures(failures: &[AgentFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type for orchestration operations.
pub type OrchestrationResult<T> = std::result::Result<T, OrchestrationError>;
