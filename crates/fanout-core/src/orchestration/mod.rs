//! Fan-out/fan-in orchestration and sequential pipelines.
//!
//! # Module layout
//!
//! - [`config`]: `OrchestratorConfig`, `FailurePolicy`
//! - [`error`]: `OrchestrationError`, `AgentFailure`
//! - [`fan_out`]: `analyze`, `synthesize`, `FanOutReport`
//! - [`pipeline`]: `run_pipeline`, `PipelineReport`
//!
//! [`Orchestrator`] wires both over a shared [`ChatBackend`] so rosters can be
//! passed as plain [`AgentSpec`] data.

pub mod config;
pub mod error;
pub mod fan_out;
pub mod pipeline;

use std::sync::Arc;

use crate::agent::{Agent, LlmAgent, LlmSynthesizer};
use crate::domain::{ensure_unique_names, AgentSpec, SynthesisRequest, SynthesisTemplate};
use crate::llm::ChatBackend;

pub use config::{placeholder_output, FailurePolicy, OrchestratorConfig};
pub use error::{AgentFailure, OrchestrationError, OrchestrationResult};
pub use fan_out::{analyze, synthesize, FanOutReport};
pub use pipeline::{run_pipeline, PipelineReport, StageOutput};

/// Runs [`AgentSpec`]-defined agents against one chat backend.
#[derive(Clone)]
pub struct Orchestrator {
    backend: Arc<dyn ChatBackend>,
    config: OrchestratorConfig,
}

impl Orchestrator {
    pub fn new(backend: Arc<dyn ChatBackend>, config: OrchestratorConfig) -> Self {
        Self { backend, config }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Same backend, different limits.
    pub fn with_config(mut self, config: OrchestratorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn agent(&self, spec: AgentSpec) -> Arc<dyn Agent> {
        Arc::new(LlmAgent::new(spec, Arc::clone(&self.backend)))
    }

    pub fn synthesizer(&self, spec: AgentSpec, template: SynthesisTemplate) -> LlmSynthesizer {
        LlmSynthesizer::new(spec, template, Arc::clone(&self.backend))
    }

    /// `analyze(input, agents, synthesizer)` over [`AgentSpec`] rosters.
    pub async fn analyze(
        &self,
        input: &str,
        agents: &[AgentSpec],
        synthesizer: &AgentSpec,
        template: SynthesisTemplate,
    ) -> OrchestrationResult<FanOutReport> {
        ensure_unique_names(agents.iter().map(AgentSpec::name))?;
        let agents = agents.iter().cloned().map(|spec| self.agent(spec)).collect();
        let synthesizer = self.synthesizer(synthesizer.clone(), template);
        analyze(input, agents, &synthesizer, &self.config).await
    }

    /// `pipeline(input, stages)` over [`AgentSpec`] rosters.
    pub async fn pipeline(
        &self,
        input: &str,
        stages: &[AgentSpec],
    ) -> OrchestrationResult<PipelineReport> {
        let stages: Vec<Arc<dyn Agent>> =
            stages.iter().cloned().map(|spec| self.agent(spec)).collect();
        run_pipeline(input, &stages, &self.config).await
    }

    /// One synthesis call on an already-assembled request.
    pub async fn synthesize(
        &self,
        request: &SynthesisRequest,
        synthesizer: &AgentSpec,
        template: SynthesisTemplate,
    ) -> OrchestrationResult<String> {
        let synthesizer = self.synthesizer(synthesizer.clone(), template);
        fan_out::with_deadline(
            self.config.deadline,
            synthesize(request, &synthesizer, self.config.agent_timeout),
        )
        .await
    }
}
