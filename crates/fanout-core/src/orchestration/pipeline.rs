//! Sequential agent pipeline: each stage's output is the next stage's input.

use std::sync::Arc;
use std::time::Instant;

use tracing::Instrument;
use uuid::Uuid;

use crate::agent::Agent;
use crate::metrics::METRICS;
use crate::obs;
use crate::orchestration::{
    config::OrchestratorConfig,
    error::{OrchestrationError, OrchestrationResult},
    fan_out::{elapsed_ms, guarded, with_deadline},
};

/// Output of one pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageOutput {
    pub index: usize,
    pub agent: String,
    pub output: String,
}

/// Outcome of a completed pipeline.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub run_id: String,
    /// Every stage in execution order.
    pub stages: Vec<StageOutput>,
    /// Output of the last stage.
    pub final_output: String,
    pub duration_ms: u64,
}

impl PipelineReport {
    /// Output of the first stage named `agent`.
    pub fn stage_output(&self, agent: &str) -> Option<&str> {
        self.stages
            .iter()
            .find(|s| s.agent == agent)
            .map(|s| s.output.as_str())
    }
}

/// Run `stages` strictly in order, feeding each output verbatim to the next.
///
/// The first failing stage aborts the pipeline; there is no placeholder
/// policy here because a later stage cannot run on missing input.
pub async fn run_pipeline(
    input: &str,
    stages: &[Arc<dyn Agent>],
    config: &OrchestratorConfig,
) -> OrchestrationResult<PipelineReport> {
    config.validate()?;
    if stages.is_empty() {
        return Err(OrchestrationError::EmptyPipeline);
    }

    let run_id = Uuid::new_v4().to_string();
    let span = obs::run_span(&run_id);
    with_deadline(
        config.deadline,
        run_stages(run_id, input, stages, config).instrument(span),
    )
    .await
}

async fn run_stages(
    run_id: String,
    input: &str,
    stages: &[Arc<dyn Agent>],
    config: &OrchestratorConfig,
) -> OrchestrationResult<PipelineReport> {
    let start = Instant::now();
    obs::emit_run_started(&run_id, "pipeline", stages.len());

    let mut outputs = Vec::with_capacity(stages.len());
    let mut current = input.to_string();

    for (index, agent) in stages.iter().enumerate() {
        let stage_start = Instant::now();
        let result = guarded(agent.run(&current), config.agent_timeout).await;
        METRICS.inc_pipeline_stages();
        obs::emit_stage_finished(
            &run_id,
            index,
            agent.name(),
            elapsed_ms(stage_start),
            result.is_ok(),
        );

        match result {
            Ok(output) => {
                outputs.push(StageOutput {
                    index,
                    agent: agent.name().to_string(),
                    output: output.clone(),
                });
                current = output;
            }
            Err(source) => {
                METRICS.inc_agent_failures();
                obs::emit_run_finished(&run_id, elapsed_ms(start), 1, false);
                return Err(OrchestrationError::StageFailed {
                    index,
                    agent: agent.name().to_string(),
                    source,
                });
            }
        }
    }

    let duration_ms = elapsed_ms(start);
    obs::emit_run_finished(&run_id, duration_ms, 0, true);

    Ok(PipelineReport {
        run_id,
        stages: outputs,
        final_output: current,
        duration_ms,
    })
}
