//! Fanout CLI
//!
//! The `fanout` command runs the built-in multi-agent workloads against an
//! OpenAI-compatible chat-completion endpoint.
//!
//! ## Commands
//!
//! - `contract`: parallel contract review with a synthesized executive summary
//!   (the default when no command is given)
//! - `refinery`: sequential refinery optimization pipeline

mod demos;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use fanout_core::{
    FailurePolicy, HttpChatBackend, OrchestrationError, Orchestrator, OrchestratorConfig, METRICS,
};
use tracing::{error, info, warn, Level};

use demos::refinery::{self, RunBudget};

#[derive(Parser)]
#[command(name = "fanout")]
#[command(author = "Fanout Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Fan-out/fan-in LLM agent orchestration", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(flatten)]
    run: RunArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Orchestration knobs shared by every command.
#[derive(Args, Debug, Clone)]
struct RunArgs {
    /// What to do when an agent fails
    #[arg(
        long,
        value_enum,
        default_value_t = OnAgentFailure::Abort,
        env = "FANOUT_ON_AGENT_FAILURE",
        global = true
    )]
    on_agent_failure: OnAgentFailure,

    /// Maximum number of agents calling the model at once
    #[arg(long, default_value_t = 4, env = "FANOUT_MAX_CONCURRENT", global = true)]
    max_concurrent: usize,

    /// Per-agent timeout in seconds (0 disables)
    #[arg(long, default_value_t = 120, env = "FANOUT_AGENT_TIMEOUT_SECS", global = true)]
    agent_timeout_secs: u64,

    /// Overall run deadline in seconds (0 disables)
    #[arg(long, default_value_t = 600, env = "FANOUT_DEADLINE_SECS", global = true)]
    deadline_secs: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OnAgentFailure {
    /// Fail the run and list every failed agent
    Abort,
    /// Substitute "No <agent> analysis available." and keep going
    Placeholder,
}

impl From<OnAgentFailure> for FailurePolicy {
    fn from(value: OnAgentFailure) -> Self {
        match value {
            OnAgentFailure::Abort => FailurePolicy::Abort,
            OnAgentFailure::Placeholder => FailurePolicy::Placeholder,
        }
    }
}

impl RunArgs {
    fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig::default()
            .with_max_concurrent(self.max_concurrent)
            .with_failure_policy(self.on_agent_failure.into())
            .with_agent_timeout(seconds(self.agent_timeout_secs))
            .with_deadline(seconds(self.deadline_secs))
    }
}

fn seconds(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a contract with legal, compliance and financial agents in parallel
    Contract {
        /// Contract text file (default: built-in consulting agreement)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Plan refinery production for a feedstock
    Refinery {
        /// Feedstock to analyze
        #[arg(short, long, default_value = demos::refinery::DEFAULT_FEEDSTOCK)]
        feedstock: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    fanout_core::init_tracing(cli.json, level);

    let result = run(cli).await;
    METRICS.flush();

    if let Err(err) = &result {
        report_failed_agents(err);
    }
    result
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.run.orchestrator_config();
    let backend =
        HttpChatBackend::from_env().context("Failed to configure chat-completion backend")?;
    info!(base_url = %backend.config().base_url, policy = %config.failure_policy, "backend configured");
    let orchestrator = Orchestrator::new(Arc::new(backend), config);

    match cli.command.unwrap_or(Commands::Contract { input: None }) {
        Commands::Contract { input } => cmd_contract(&orchestrator, input.as_deref()).await,
        Commands::Refinery { feedstock } => cmd_refinery(&orchestrator, &feedstock).await,
    }
}

/// Run the parallel contract review and print the executive summary.
async fn cmd_contract(orchestrator: &Orchestrator, input: Option<&Path>) -> Result<()> {
    let contract = demos::contract::load_contract(input)?;

    println!("Enterprise Contract Analysis System");
    println!("Analyzing contract...");

    let report = demos::contract::analyze_contract(orchestrator, &contract)
        .await
        .context("Contract analysis failed")?;

    for failure in &report.failures {
        warn!(agent = %failure.agent, error = %failure.error, "placeholder used for failed agent");
    }
    if report.is_degraded() {
        eprintln!(
            "Warning: {} agent(s) failed; their sections were replaced with placeholders",
            report.failures.len()
        );
    }

    println!("\n=== FINAL CONTRACT ANALYSIS ===\n");
    println!("{}", report.final_report);
    Ok(())
}

/// Run the refinery pipeline, printing every stage before the optimizer runs.
async fn cmd_refinery(orchestrator: &Orchestrator, feedstock: &str) -> Result<()> {
    println!("Processing feedstock: {}\n", feedstock);

    let budget = RunBudget::start(orchestrator.config().deadline);
    let pipeline = refinery::run_stages(orchestrator, feedstock, &budget)
        .await
        .context("Refinery pipeline failed")?;

    for stage in &pipeline.stages {
        println!(
            "\n--- {} ---\n{}\n",
            refinery::stage_heading(&stage.agent),
            stage.output
        );
    }

    let recommendation = refinery::optimize(orchestrator, &pipeline, &budget)
        .await
        .context("Production optimization failed")?;
    println!(
        "\n--- OPTIMIZED PRODUCTION RECOMMENDATION ---\n{}\n",
        recommendation
    );
    Ok(())
}

/// Name the agents behind an orchestration failure before the error is printed.
fn report_failed_agents(err: &anyhow::Error) {
    let Some(orchestration) = err.downcast_ref::<OrchestrationError>() else {
        return;
    };
    let failed = orchestration.failed_agents();
    if failed.is_empty() {
        return;
    }
    error!(agents = ?failed, "agent run failed");
    eprintln!("Failed agents: {}", failed.join(", "));
}
