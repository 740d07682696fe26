//! Refinery optimization: a three-stage pipeline followed by one
//! production-optimizer synthesis over the distillation plan and market
//! analysis.

use std::time::Duration;

use anyhow::{Context, Result};
use fanout_core::domain::Result as SpecResult;
use fanout_core::{
    AgentSpec, OrchestrationError, OrchestrationResult, Orchestrator, OutputMap, PipelineReport,
    SynthesisRequest, SynthesisTemplate,
};
use tokio::time::Instant;

pub const DEFAULT_FEEDSTOCK: &str = "West Texas Intermediate Crude";

pub const FEEDSTOCK: &str = "feedstock";
pub const DISTILLATION: &str = "distillation";
pub const MARKET: &str = "market";

const MODEL: &str = "gpt-3.5-turbo";
const TEMPERATURE: f32 = 0.2;

/// One deadline spread over the pipeline and the optimizer call.
#[derive(Debug, Clone, Copy)]
pub struct RunBudget {
    started: Instant,
    deadline: Option<Duration>,
}

impl RunBudget {
    pub fn start(deadline: Option<Duration>) -> Self {
        Self {
            started: Instant::now(),
            deadline,
        }
    }

    /// Time left, or `DeadlineExceeded` once it is spent.
    pub fn remaining(&self) -> OrchestrationResult<Option<Duration>> {
        let Some(limit) = self.deadline else {
            return Ok(None);
        };
        let left = limit.saturating_sub(self.started.elapsed());
        if left.is_zero() {
            return Err(OrchestrationError::DeadlineExceeded(limit));
        }
        Ok(Some(left))
    }

    /// `orchestrator` limited to whatever is left of the budget.
    fn bound(&self, orchestrator: &Orchestrator) -> OrchestrationResult<Orchestrator> {
        let config = orchestrator.config().clone().with_deadline(self.remaining()?);
        Ok(orchestrator.clone().with_config(config))
    }
}

/// Feedstock analyst, distillation planner and market analyst, in order.
pub fn stages() -> SpecResult<Vec<AgentSpec>> {
    Ok(vec![
        AgentSpec::new(
            FEEDSTOCK,
            "You are a petrochemical expert analyzing hydrocarbon feedstocks. Provide a concise \
             analysis of the given feedstock, highlighting its key components and general \
             suitability for producing valuable refined products like gasoline, diesel, and \
             kerosene.",
            MODEL,
            TEMPERATURE,
        )?
        .with_input_template("Analyze the feedstock: {input}")?,
        AgentSpec::new(
            DISTILLATION,
            "You are a refinery distillation tower operations planner. Based on the provided \
             feedstock analysis, estimate the potential percentage yields for major products \
             like gasoline, diesel, and kerosene. Be realistic.",
            MODEL,
            TEMPERATURE,
        )?
        .with_input_template("Based on this feedstock report, plan the distillation:\n\n{input}")?,
        AgentSpec::new(
            MARKET,
            "You are an energy market analyst. For the following list of refined products, \
             provide a brief analysis of current market demand (high, medium, low) and general \
             profitability trends.",
            MODEL,
            TEMPERATURE,
        )?
        .with_input_template("Analyze market conditions for the following products:\n{input}")?,
    ])
}

pub fn optimizer() -> SpecResult<AgentSpec> {
    AgentSpec::new(
        "optimizer",
        "You are a refinery production optimization expert. Your goal is to recommend a \
         production strategy based on potential yields and current market conditions.",
        MODEL,
        TEMPERATURE,
    )
}

pub fn optimizer_template() -> SynthesisTemplate {
    SynthesisTemplate::default()
        .with_preamble("Given the following potential distillation plan:")
        .with_input_label("DISTILLATION PLAN")
        .with_section(MARKET, "And the following market analysis")
        .with_closing_instruction(
            "Please provide a concise recommendation on which products the refinery should \
             prioritize or focus on to maximize value, considering both the potential yield \
             and market conditions.",
        )
}

/// Heading printed above a stage's output.
pub fn stage_heading(agent: &str) -> &'static str {
    match agent {
        FEEDSTOCK => "Feedstock Analysis",
        DISTILLATION => "Distillation Plan",
        MARKET => "Market Analysis",
        _ => "Stage Output",
    }
}

/// The optimizer sees the distillation plan as its input and the market
/// analysis as its only collected output.
pub fn optimizer_request(pipeline: &PipelineReport) -> Result<SynthesisRequest> {
    let plan = pipeline
        .stage_output(DISTILLATION)
        .context("pipeline produced no distillation plan")?;
    let market = pipeline
        .stage_output(MARKET)
        .context("pipeline produced no market analysis")?;

    let mut outputs = OutputMap::new();
    outputs.insert(MARKET.to_string(), market.to_string());
    Ok(SynthesisRequest::new(plan, outputs))
}

/// Feedstock analysis, distillation plan and market analysis, in order.
pub async fn run_stages(
    orchestrator: &Orchestrator,
    feedstock: &str,
    budget: &RunBudget,
) -> OrchestrationResult<PipelineReport> {
    budget
        .bound(orchestrator)?
        .pipeline(feedstock, &stages()?)
        .await
}

/// Production recommendation from a finished pipeline.
pub async fn optimize(
    orchestrator: &Orchestrator,
    pipeline: &PipelineReport,
    budget: &RunBudget,
) -> Result<String> {
    let request = optimizer_request(pipeline)?;
    let recommendation = budget
        .bound(orchestrator)?
        .synthesize(&request, &optimizer()?, optimizer_template())
        .await?;
    Ok(recommendation)
}
