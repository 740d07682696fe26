//! Observability tests for fan-out and pipeline lifecycle tracing.

use std::sync::Arc;

use fanout_core::obs::{
    emit_agent_finished, emit_run_finished, emit_run_started, emit_stage_finished,
    emit_synthesis_started,
};
use fanout_core::{
    analyze, run_pipeline, Agent, AgentError, FailurePolicy, FnAgent, FnSynthesizer,
    OrchestratorConfig, SynthesisRequest,
};
use tracing_test::traced_test;

fn ok_agent(name: &'static str) -> Arc<dyn Agent> {
    Arc::new(FnAgent::new(name, |input: String| async move {
        Ok::<_, AgentError>(input)
    }))
}

#[traced_test]
#[test]
fn test_emit_helpers_log_event_names() {
    emit_run_started("run-123", "fan_out", 3);
    emit_agent_finished("run-123", "legal", 40, None);
    emit_synthesis_started("run-123", "summary", 3);
    emit_stage_finished("run-123", 0, "feedstock", 12, true);
    emit_run_finished("run-123", 5000, 0, true);

    assert!(logs_contain("run.started"));
    assert!(logs_contain("agent.finished"));
    assert!(logs_contain("synthesis.started"));
    assert!(logs_contain("stage.finished"));
    assert!(logs_contain("run.finished"));
    assert!(logs_contain("run-123"));
}

#[traced_test]
#[test]
fn test_failed_agent_logs_error_text() {
    emit_agent_finished("run-err-001", "compliance", 7, Some(&"connection refused"));
    assert!(logs_contain("WARN"));
    assert!(logs_contain("connection refused"));
}

#[traced_test]
#[tokio::test]
async fn test_analyze_emits_lifecycle_events() {
    let failing: Arc<dyn Agent> = Arc::new(FnAgent::new("compliance", |_input: String| async move {
        Err::<String, _>(AgentError::Transport("connection reset".to_string()))
    }));
    let synth = FnSynthesizer::new("summary", |request: SynthesisRequest| async move {
        Ok::<_, AgentError>(format!("{} inputs", request.collected_outputs.len()))
    });

    let report = analyze(
        "contract",
        vec![ok_agent("legal"), failing],
        &synth,
        &OrchestratorConfig::default().with_failure_policy(FailurePolicy::Placeholder),
    )
    .await
    .unwrap();

    assert_eq!(report.final_report, "2 inputs");
    assert!(logs_contain("run.started"));
    assert!(logs_contain("fan_out"));
    assert!(logs_contain("agent.finished"));
    assert!(logs_contain("connection reset"));
    assert!(logs_contain("synthesis.started"));
    assert!(logs_contain("run.finished"));
    assert!(logs_contain(&report.run_id));
}

#[traced_test]
#[tokio::test]
async fn test_pipeline_emits_stage_events() {
    let report = run_pipeline(
        "crude",
        &[ok_agent("feedstock"), ok_agent("distillation")],
        &OrchestratorConfig::default(),
    )
    .await
    .unwrap();

    assert_eq!(report.final_output, "crude");
    assert!(logs_contain("stage.finished"));
    assert!(logs_contain("distillation"));
    assert!(logs_contain("pipeline"));
}
