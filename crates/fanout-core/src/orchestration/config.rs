//! Orchestrator knobs: concurrency cap, failure policy, timeouts.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::{OrchestrationError, OrchestrationResult};

/// What a fan-out run does when one or more agents fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Wait for every agent, then fail the run listing each failed agent.
    /// The synthesizer is never invoked.
    #[default]
    Abort,
    /// Substitute [`placeholder_output`] for each failed agent and
    /// synthesize anyway. Failures are still reported.
    Placeholder,
}

impl std::fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FailurePolicy::Abort => "abort",
            FailurePolicy::Placeholder => "placeholder",
        };
        write!(f, "{s}")
    }
}

/// Text stored under a failed agent's key with [`FailurePolicy::Placeholder`].
pub fn placeholder_output(agent: &str) -> String {
    format!("No {agent} analysis available.")
}

/// Configuration for fan-out runs and pipelines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Maximum number of agent calls in flight at once.
    pub max_concurrent: usize,
    pub failure_policy: FailurePolicy,
    /// Limit on each agent or synthesizer call.
    pub agent_timeout: Option<Duration>,
    /// Limit on the whole run, fan-out and synthesis (or every stage) included.
    pub deadline: Option<Duration>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 4,
            failure_policy: FailurePolicy::Abort,
            agent_timeout: Some(Duration::from_secs(120)),
            deadline: Some(Duration::from_secs(600)),
        }
    }
}

impl OrchestratorConfig {
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_agent_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.agent_timeout = timeout;
        self
    }

    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn validate(&self) -> OrchestrationResult<()> {
        if self.max_concurrent == 0 {
            return Err(OrchestrationError::InvalidConfig(
                "max_concurrent must be at least 1".to_string(),
            ));
        }
        if self.agent_timeout == Some(Duration::ZERO) {
            return Err(OrchestrationError::InvalidConfig(
                "agent_timeout must be positive".to_string(),
            ));
        }
        if self.deadline == Some(Duration::ZERO) {
            return Err(OrchestrationError::InvalidConfig(
                "deadline must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
