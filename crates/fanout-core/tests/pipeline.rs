//! Sequential pipeline tests.

use std::sync::Arc;
use std::time::Duration;

use fanout_core::{
    run_pipeline, Agent, AgentError, FnAgent, OrchestrationError, OrchestratorConfig,
};

fn wrap_agent(name: &'static str) -> Arc<dyn Agent> {
    Arc::new(FnAgent::new(name, move |input: String| async move {
        Ok::<_, AgentError>(format!("{name}({input})"))
    }))
}

#[tokio::test]
async fn test_pipeline_threads_each_output_into_next_stage() {
    let stages = vec![wrap_agent("f"), wrap_agent("g"), wrap_agent("h")];

    let report = run_pipeline("x", &stages, &OrchestratorConfig::default())
        .await
        .unwrap();

    assert_eq!(report.final_output, "h(g(f(x)))");
    assert_eq!(report.stages.len(), 3);
    assert_eq!(report.stages[0].index, 0);
    assert_eq!(report.stage_output("f"), Some("f(x)"));
    assert_eq!(report.stage_output("g"), Some("g(f(x))"));
    assert_eq!(report.stage_output("missing"), None);
}

#[tokio::test]
async fn test_single_stage_pipeline_is_one_call() {
    let report = run_pipeline("crude", &[wrap_agent("only")], &OrchestratorConfig::default())
        .await
        .unwrap();
    assert_eq!(report.final_output, "only(crude)");
}

#[tokio::test]
async fn test_repeated_stage_names_are_allowed() {
    let refine = wrap_agent("refine");
    let stages = vec![Arc::clone(&refine), refine];

    let report = run_pipeline("x", &stages, &OrchestratorConfig::default())
        .await
        .unwrap();
    assert_eq!(report.final_output, "refine(refine(x))");
}

#[tokio::test]
async fn test_failing_stage_stops_pipeline() {
    let calls = Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let after: Arc<dyn Agent> = Arc::new(FnAgent::new("after", move |input: String| {
        counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        async move { Ok::<_, AgentError>(input) }
    }));
    let broken: Arc<dyn Agent> = Arc::new(FnAgent::new("distillation", |_input: String| async move {
        Err::<String, _>(AgentError::MalformedResponse("missing content".to_string()))
    }));

    let err = run_pipeline(
        "x",
        &[wrap_agent("feedstock"), broken, after],
        &OrchestratorConfig::default(),
    )
    .await
    .unwrap_err();

    match &err {
        OrchestrationError::StageFailed { index, agent, source } => {
            assert_eq!(*index, 1);
            assert_eq!(agent, "distillation");
            assert!(!source.is_transport());
        }
        other => panic!("expected StageFailed, got {other:?}"),
    }
    assert_eq!(err.failed_agents(), vec!["distillation"]);
    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_empty_pipeline_rejected() {
    let err = run_pipeline("x", &[], &OrchestratorConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, OrchestrationError::EmptyPipeline));
}

#[tokio::test(start_paused = true)]
async fn test_stage_timeout_fails_pipeline() {
    let hung: Arc<dyn Agent> = Arc::new(FnAgent::new("hung", |input: String| async move {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok::<_, AgentError>(input)
    }));

    let err = run_pipeline(
        "x",
        &[hung],
        &OrchestratorConfig::default()
            .with_agent_timeout(Some(Duration::from_secs(2)))
            .with_deadline(None),
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        OrchestrationError::StageFailed { source: AgentError::Timeout(_), index: 0, .. }
    ));
}

#[tokio::test]
async fn test_invalid_config_rejected_before_running() {
    let err = run_pipeline(
        "x",
        &[wrap_agent("f")],
        &OrchestratorConfig::default().with_max_concurrent(0),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, OrchestrationError::InvalidConfig(_)));
}
