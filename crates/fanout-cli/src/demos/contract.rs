//! Parallel contract review: three specialist analysts, one senior-counsel
//! synthesis.

use std::path::Path;

use anyhow::{bail, Context, Result};
use fanout_core::domain::Result as SpecResult;
use fanout_core::{AgentSpec, FanOutReport, OrchestrationResult, Orchestrator, SynthesisTemplate};

pub const LEGAL: &str = "legal";
pub const COMPLIANCE: &str = "compliance";
pub const FINANCIAL: &str = "financial";

const ANALYST_MODEL: &str = "gpt-3.5-turbo";
const ANALYST_TEMPERATURE: f32 = 0.2;
const COUNSEL_MODEL: &str = "gpt-4";
const COUNSEL_TEMPERATURE: f32 = 0.3;
const CONTRACT_PREVIEW_CHARS: usize = 500;

/// Sample agreement analyzed when no `--input` file is given.
pub const SAMPLE_CONTRACT: &str = r#"
CONSULTING AGREEMENT

This Consulting Agreement (the "Agreement") is made effective as of January 1, 2025 (the "Effective Date"), by and between ABC Corporation, a Delaware corporation ("Client"), and XYZ Consulting LLC, a California limited liability company ("Consultant").

1. SERVICES. Consultant shall provide Client with the following services: strategic business consulting, market analysis, and technology implementation advice (the "Services").

2. TERM. This Agreement shall commence on the Effective Date and shall continue for a period of 12 months, unless earlier terminated.

3. COMPENSATION. Client shall pay Consultant a fee of $10,000 per month for Services rendered. Payment shall be made within 30 days of receipt of Consultant's invoice.

4. CONFIDENTIALITY. Consultant acknowledges that during the engagement, Consultant may have access to confidential information. Consultant agrees to maintain the confidentiality of all such information.

5. INTELLECTUAL PROPERTY. All materials developed by Consultant shall be the property of Client. Consultant assigns all right, title, and interest in such materials to Client.

6. TERMINATION. Either party may terminate this Agreement with 30 days' written notice. Client shall pay Consultant for Services performed through the termination date.

7. GOVERNING LAW. This Agreement shall be governed by the laws of the State of Delaware.

8. LIMITATION OF LIABILITY. Consultant's liability shall be limited to the amount of fees paid by Client under this Agreement.

9. INDEMNIFICATION. Client shall indemnify Consultant against all claims arising from use of materials provided by Client.

10. ENTIRE AGREEMENT. This Agreement constitutes the entire understanding between the parties and supersedes all prior agreements.

IN WITNESS WHEREOF, the parties have executed this Agreement as of the date first above written.
"#;

/// Contract text from `path`, or the built-in sample.
pub fn load_contract(path: Option<&Path>) -> Result<String> {
    let Some(path) = path else {
        return Ok(SAMPLE_CONTRACT.to_string());
    };

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read contract file: {:?}", path))?;
    if text.trim().is_empty() {
        bail!("Contract file {:?} is empty", path);
    }
    Ok(text)
}

fn analyst(name: &str, specialty: &str) -> SpecResult<AgentSpec> {
    let prompt = format!(
        "You are a {specialty} expert specializing in contract law. Review the provided \
         contract text and identify any problematic clauses, ambiguous terms, or \
         non-standard {specialty} language. List your key findings."
    );
    AgentSpec::new(name, prompt, ANALYST_MODEL, ANALYST_TEMPERATURE)
}

/// Legal terms checker, compliance validator and financial risk assessor.
pub fn analysts() -> SpecResult<Vec<AgentSpec>> {
    Ok(vec![
        analyst(LEGAL, "legal")?,
        analyst(COMPLIANCE, "compliance")?,
        analyst(FINANCIAL, "financial")?,
    ])
}

pub fn senior_counsel() -> SpecResult<AgentSpec> {
    AgentSpec::new(
        "summary",
        "You are a senior legal counsel. You have received analyses on a contract from legal \
         terms, compliance, and financial risk specialists. Your task is to synthesize these \
         findings into a single, comprehensive executive summary of the contract's overall \
         status and key concerns.",
        COUNSEL_MODEL,
        COUNSEL_TEMPERATURE,
    )
}

pub fn summary_template() -> SynthesisTemplate {
    SynthesisTemplate::default()
        .with_preamble(
            "Please synthesize the following analyses of a contract into a comprehensive \
             summary report.\nOriginal Contract Text (for reference, if needed, but focus on \
             the analyses):",
        )
        .with_input_label("CONTRACT TEXT")
        .with_input_preview(CONTRACT_PREVIEW_CHARS)
        .with_section_fallback(LEGAL, "Legal Terms Analysis", "No legal analysis provided.")
        .with_section_fallback(
            COMPLIANCE,
            "Compliance Validation",
            "No compliance analysis provided.",
        )
        .with_section_fallback(
            FINANCIAL,
            "Financial Risk Assessment",
            "No financial analysis provided.",
        )
        .with_closing_instruction(
            "Provide a consolidated executive summary identifying key issues and an overall \
             assessment.",
        )
}

/// Fan the contract out to every analyst and synthesize the findings.
pub async fn analyze_contract(
    orchestrator: &Orchestrator,
    contract: &str,
) -> OrchestrationResult<FanOutReport> {
    orchestrator
        .analyze(contract, &analysts()?, &senior_counsel()?, summary_template())
        .await
}
