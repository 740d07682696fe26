//! Agents: named units that turn one text input into one text output.
//!
//! # Module layout
//!
//! - [`error`]: `AgentError`, `AgentResult`
//! - [`llm`]: `LlmAgent`, `LlmSynthesizer` (one completion call each)
//! - [`func`]: `FnAgent`, `FnSynthesizer` closure adapters

pub mod error;
pub mod func;
pub mod llm;

use async_trait::async_trait;

use crate::domain::SynthesisRequest;

pub use error::{AgentError, AgentResult};
pub use func::{FnAgent, FnSynthesizer};
pub use llm::{LlmAgent, LlmSynthesizer};

/// A leaf unit of work: one input, one output, no dependency on other agents.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Unique key of this agent's output in an `OutputMap`.
    fn name(&self) -> &str;

    async fn run(&self, input: &str) -> AgentResult<String>;
}

/// The fan-in step that consolidates every collected output.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    fn name(&self) -> &str;

    async fn synthesize(&self, request: &SynthesisRequest) -> AgentResult<String>;
}
