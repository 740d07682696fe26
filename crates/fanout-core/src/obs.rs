//! Structured lifecycle events for fan-out runs and pipelines.
//!
//! Events are emitted at `info!` level (failures at `warn!`) with an
//! `event` field so log pipelines can filter on it. Runs execute inside
//! [`run_span`] so every event carries its `run_id`.

use tracing::{info, warn};

/// The span every orchestrated run executes inside.
pub fn run_span(run_id: &str) -> tracing::Span {
    tracing::info_span!("fanout.run", run_id = %run_id)
}

pub fn emit_run_started(run_id: &str, kind: &str, agents: usize) {
    info!(event = "run.started", run_id = %run_id, kind = %kind, agents = agents);
}

pub fn emit_run_finished(run_id: &str, duration_ms: u64, failed_agents: usize, success: bool) {
    info!(
        event = "run.finished",
        run_id = %run_id,
        duration_ms = duration_ms,
        failed_agents = failed_agents,
        success = success,
    );
}

/// One fan-out branch returned. Failures are logged at `warn!`.
pub fn emit_agent_finished(
    run_id: &str,
    agent: &str,
    duration_ms: u64,
    error: Option<&dyn std::fmt::Display>,
) {
    match error {
        None => info!(
            event = "agent.finished",
            run_id = %run_id,
            agent = %agent,
            duration_ms = duration_ms,
            success = true,
        ),
        Some(error) => warn!(
            event = "agent.finished",
            run_id = %run_id,
            agent = %agent,
            duration_ms = duration_ms,
            success = false,
            error = %error,
        ),
    }
}

pub fn emit_synthesis_started(run_id: &str, synthesizer: &str, inputs: usize) {
    info!(event = "synthesis.started", run_id = %run_id, agent = %synthesizer, inputs = inputs);
}

pub fn emit_stage_finished(run_id: &str, index: usize, agent: &str, duration_ms: u64, success: bool) {
    info!(
        event = "stage.finished",
        run_id = %run_id,
        index = index,
        agent = %agent,
        duration_ms = duration_ms,
        success = success,
    );
}
