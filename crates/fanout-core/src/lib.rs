//! Fanout Core Library
//!
//! Runs independent LLM-backed agents in parallel over one input, waits for
//! all of them, and hands every output to a synthesis agent. Also provides
//! the degenerate sequential form where each agent feeds the next.

pub mod agent;
pub mod domain;
pub mod llm;
pub mod metrics;
pub mod obs;
pub mod orchestration;
pub mod telemetry;

pub use agent::{
    Agent, AgentError, AgentResult, FnAgent, FnSynthesizer, LlmAgent, LlmSynthesizer, Synthesizer,
};
pub use domain::{
    AgentSpec, FanoutError, OutputMap, SynthesisRequest, SynthesisSection, SynthesisTemplate,
};
pub use llm::{ChatBackend, ConfigError, HttpChatBackend, LlmConfig};
pub use orchestration::{
    analyze, run_pipeline, synthesize, AgentFailure, FailurePolicy, FanOutReport,
    OrchestrationError, OrchestrationResult, Orchestrator, OrchestratorConfig, PipelineReport,
    StageOutput,
};

pub use metrics::METRICS;
pub use telemetry::init_tracing;

/// Fanout version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
