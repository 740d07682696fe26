//! Fan-out/fan-in execution.
//!
//! Every agent runs in its own tokio task over the same input and hands its
//! result back through the task's join handle, so no result map is shared
//! between tasks. The orchestrator waits for all of them (the barrier), builds
//! the [`OutputMap`] and only then calls the synthesizer.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use futures::FutureExt;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{Instrument, Span};
use uuid::Uuid;

use crate::agent::{Agent, AgentError, AgentResult, Synthesizer};
use crate::domain::{ensure_unique_names, FanoutError, OutputMap, SynthesisRequest};
use crate::metrics::METRICS;
use crate::obs;
use crate::orchestration::{
    config::{placeholder_output, FailurePolicy, OrchestratorConfig},
    error::{AgentFailure, OrchestrationError, OrchestrationResult},
};

/// Outcome of a completed fan-out/fan-in run.
#[derive(Debug, Clone)]
pub struct FanOutReport {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    /// Exactly one entry per agent. Under [`FailurePolicy::Placeholder`] a
    /// failed agent's entry is its placeholder text.
    pub outputs: OutputMap,
    /// Agents that failed, sorted by name. Empty on a clean run.
    pub failures: Vec<AgentFailure>,
    /// The synthesizer's consolidated text.
    pub final_report: String,
    pub duration_ms: u64,
}

impl FanOutReport {
    /// `true` when at least one output is a placeholder.
    pub fn is_degraded(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Result of one branch, returned through its join handle.
struct AgentRun {
    agent: String,
    result: AgentResult<String>,
}

/// Run `agents` in parallel over `input`, then synthesize their outputs.
///
/// Duplicate agent names and empty rosters are rejected before anything is
/// spawned. On deadline expiry every outstanding task is aborted.
pub async fn analyze(
    input: &str,
    agents: Vec<Arc<dyn Agent>>,
    synthesizer: &dyn Synthesizer,
    config: &OrchestratorConfig,
) -> OrchestrationResult<FanOutReport> {
    config.validate()?;
    if agents.is_empty() {
        return Err(FanoutError::NoAgents.into());
    }
    ensure_unique_names(agents.iter().map(|a| a.name()))?;

    let run_id = Uuid::new_v4().to_string();
    let span = obs::run_span(&run_id);
    let run = fan_out_and_synthesize(run_id, input, agents, synthesizer, config).instrument(span);
    with_deadline(config.deadline, run).await
}

async fn fan_out_and_synthesize(
    run_id: String,
    input: &str,
    agents: Vec<Arc<dyn Agent>>,
    synthesizer: &dyn Synthesizer,
    config: &OrchestratorConfig,
) -> OrchestrationResult<FanOutReport> {
    let started_at = Utc::now();
    let start = Instant::now();
    obs::emit_run_started(&run_id, "fan_out", agents.len());

    let runs = fan_out(&run_id, input, agents, config).await?;

    let mut outputs = OutputMap::new();
    let mut failures = Vec::new();
    for run in runs {
        match run.result {
            Ok(text) => {
                outputs.insert(run.agent, text);
            }
            Err(error) => {
                METRICS.inc_agent_failures();
                failures.push(AgentFailure {
                    agent: run.agent,
                    error,
                });
            }
        }
    }
    failures.sort_by(|a, b| a.agent.cmp(&b.agent));

    if !failures.is_empty() {
        match config.failure_policy {
            FailurePolicy::Abort => {
                obs::emit_run_finished(&run_id, elapsed_ms(start), failures.len(), false);
                return Err(OrchestrationError::AgentsFailed { failures });
            }
            FailurePolicy::Placeholder => {
                for failure in &failures {
                    outputs.insert(failure.agent.clone(), placeholder_output(&failure.agent));
                }
            }
        }
    }

    let request = SynthesisRequest::new(input, outputs);
    obs::emit_synthesis_started(&run_id, synthesizer.name(), request.collected_outputs.len());
    let final_report = match synthesize(&request, synthesizer, config.agent_timeout).await {
        Ok(report) => report,
        Err(err) => {
            obs::emit_run_finished(&run_id, elapsed_ms(start), failures.len(), false);
            return Err(err);
        }
    };

    let duration_ms = elapsed_ms(start);
    obs::emit_run_finished(&run_id, duration_ms, failures.len(), true);

    Ok(FanOutReport {
        run_id,
        started_at,
        outputs: request.collected_outputs,
        failures,
        final_report,
        duration_ms,
    })
}

/// Spawn one task per agent and wait for all of them.
async fn fan_out(
    run_id: &str,
    input: &str,
    agents: Vec<Arc<dyn Agent>>,
    config: &OrchestratorConfig,
) -> OrchestrationResult<Vec<AgentRun>> {
    let input: Arc<str> = Arc::from(input);
    let semaphore = Arc::new(Semaphore::new(config.max_concurrent));
    let mut tasks = JoinSet::new();
    let expected = agents.len();

    for agent in agents {
        let input = Arc::clone(&input);
        let semaphore = Arc::clone(&semaphore);
        let run_id = run_id.to_string();
        let timeout = config.agent_timeout;

        tasks.spawn(
            async move {
                let _permit = semaphore.acquire_owned().await.ok();
                let started = Instant::now();
                let result = guarded(agent.run(&input), timeout).await;
                obs::emit_agent_finished(
                    &run_id,
                    agent.name(),
                    elapsed_ms(started),
                    result.as_ref().err().map(|e| e as &dyn std::fmt::Display),
                );
                AgentRun {
                    agent: agent.name().to_string(),
                    result,
                }
            }
            .instrument(Span::current()),
        );
    }

    let mut runs = Vec::with_capacity(expected);
    while let Some(joined) = tasks.join_next().await {
        let run = joined.map_err(|e| OrchestrationError::Join(e.to_string()))?;
        runs.push(run);
    }
    Ok(runs)
}

/// Invoke `synthesizer` once on a complete request.
pub async fn synthesize(
    request: &SynthesisRequest,
    synthesizer: &dyn Synthesizer,
    timeout: Option<Duration>,
) -> OrchestrationResult<String> {
    guarded(synthesizer.synthesize(request), timeout)
        .await
        .map_err(|source| OrchestrationError::Synthesis {
            agent: synthesizer.name().to_string(),
            source,
        })
}

/// Apply the per-call timeout and turn a panic into [`AgentError::Panicked`].
pub(crate) async fn guarded<F>(call: F, timeout: Option<Duration>) -> AgentResult<String>
where
    F: Future<Output = AgentResult<String>>,
{
    let call = AssertUnwindSafe(call).catch_unwind();
    let outcome = match timeout {
        Some(limit) => match tokio::time::timeout(limit, call).await {
            Ok(outcome) => outcome,
            Err(_) => return Err(AgentError::Timeout(limit)),
        },
        None => call.await,
    };
    outcome.unwrap_or_else(|panic| Err(AgentError::Panicked(panic_message(panic.as_ref()))))
}

/// Run `fut` under an optional overall deadline. Dropping the inner future on
/// expiry drops its `JoinSet`, which aborts every outstanding agent task.
pub(crate) async fn with_deadline<T, F>(
    deadline: Option<Duration>,
    fut: F,
) -> OrchestrationResult<T>
where
    F: Future<Output = OrchestrationResult<T>>,
{
    match deadline {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| OrchestrationError::DeadlineExceeded(limit))?,
        None => fut.await,
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

pub(crate) fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_guarded_passes_through_success() {
        let out = guarded(async { Ok("done".to_string()) }, None).await;
        assert_eq!(out.unwrap(), "done");
    }

    #[tokio::test(start_paused = true)]
    async fn test_guarded_times_out() {
        let slow = async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok("late".to_string())
        };
        let err = guarded(slow, Some(Duration::from_secs(1))).await.unwrap_err();
        assert_eq!(err, AgentError::Timeout(Duration::from_secs(1)));
    }

    #[tokio::test]
    async fn test_guarded_converts_panic() {
        let boom = async {
            if true {
                panic!("model exploded");
            }
            Ok(String::new())
        };
        let err = guarded(boom, None).await.unwrap_err();
        assert_eq!(err, AgentError::Panicked("model exploded".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_with_deadline_expires() {
        let slow = async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok::<_, OrchestrationError>(())
        };
        let err = with_deadline(Some(Duration::from_secs(5)), slow)
            .await
            .unwrap_err();
        assert!(matches!(err, OrchestrationError::DeadlineExceeded(d) if d == Duration::from_secs(5)));
    }
}
