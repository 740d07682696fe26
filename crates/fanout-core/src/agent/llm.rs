//! Agents backed by a chat-completion endpoint.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;

use super::error::AgentResult;
use super::{Agent, Synthesizer};
use crate::domain::{AgentSpec, SynthesisRequest, SynthesisTemplate};
use crate::llm::{ChatBackend, ChatCompletionRequest};
use crate::metrics::METRICS;

/// A generic agent: fixed role prompt + one completion call per input.
#[derive(Clone)]
pub struct LlmAgent {
    spec: AgentSpec,
    backend: Arc<dyn ChatBackend>,
}

impl LlmAgent {
    pub fn new(spec: AgentSpec, backend: Arc<dyn ChatBackend>) -> Self {
        Self { spec, backend }
    }

    pub fn spec(&self) -> &AgentSpec {
        &self.spec
    }

    /// The exact request `run(input)` will send.
    pub fn build_request(&self, input: &str) -> ChatCompletionRequest {
        ChatCompletionRequest::for_agent(&self.spec, self.spec.render_input(input))
    }
}

#[async_trait]
impl Agent for LlmAgent {
    fn name(&self) -> &str {
        self.spec.name()
    }

    #[instrument(skip(self, input), fields(agent = %self.spec.name(), model = %self.spec.model_id()))]
    async fn run(&self, input: &str) -> AgentResult<String> {
        METRICS.inc_agent_calls();
        let completion = self.backend.complete(&self.build_request(input)).await?;
        Ok(completion.content)
    }
}

/// The fan-in agent: renders a [`SynthesisRequest`] through a template and
/// asks the model for one consolidated report.
#[derive(Clone)]
pub struct LlmSynthesizer {
    spec: AgentSpec,
    template: SynthesisTemplate,
    backend: Arc<dyn ChatBackend>,
}

impl LlmSynthesizer {
    pub fn new(spec: AgentSpec, template: SynthesisTemplate, backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            spec,
            template,
            backend,
        }
    }

    pub fn spec(&self) -> &AgentSpec {
        &self.spec
    }

    pub fn template(&self) -> &SynthesisTemplate {
        &self.template
    }

    pub fn build_request(&self, request: &SynthesisRequest) -> ChatCompletionRequest {
        ChatCompletionRequest::for_agent(&self.spec, self.template.render(request))
    }
}

#[async_trait]
impl Synthesizer for LlmSynthesizer {
    fn name(&self) -> &str {
        self.spec.name()
    }

    #[instrument(skip(self, request), fields(agent = %self.spec.name(), inputs = request.collected_outputs.len()))]
    async fn synthesize(&self, request: &SynthesisRequest) -> AgentResult<String> {
        METRICS.inc_syntheses();
        let completion = self.backend.complete(&self.build_request(request)).await?;
        Ok(completion.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::error::AgentError;
    use crate::domain::OutputMap;
    use crate::llm::{ChatRole, Completion};
    use std::sync::Mutex;

    /// Records every request and echoes the user message back.
    #[derive(Default)]
    struct EchoBackend {
        seen: Mutex<Vec<ChatCompletionRequest>>,
    }

    #[async_trait]
    impl ChatBackend for EchoBackend {
        async fn complete(&self, request: &ChatCompletionRequest) -> AgentResult<Completion> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(Completion {
                content: format!("echo:{}", request.messages[1].content),
                model: Some(request.model.clone()),
                usage: None,
            })
        }
    }

    struct FailingBackend;

    #[async_trait]
    impl ChatBackend for FailingBackend {
        async fn complete(&self, _request: &ChatCompletionRequest) -> AgentResult<Completion> {
            Err(AgentError::MalformedResponse("no choices".to_string()))
        }
    }

    #[tokio::test]
    async fn test_llm_agent_sends_role_prompt_and_rendered_input() {
        let backend = Arc::new(EchoBackend::default());
        let spec = AgentSpec::new("feedstock", "You are a petrochemical expert.", "gpt-3.5-turbo", 0.2)
            .unwrap()
            .with_input_template("Analyze the feedstock: {input}")
            .unwrap();
        let agent = LlmAgent::new(spec, backend.clone());

        let out = agent.run("Brent Crude").await.unwrap();
        assert_eq!(out, "echo:Analyze the feedstock: Brent Crude");
        assert_eq!(agent.name(), "feedstock");

        let seen = backend.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].model, "gpt-3.5-turbo");
        assert_eq!(seen[0].messages.len(), 2);
        assert_eq!(seen[0].messages[0].role, ChatRole::System);
        assert_eq!(seen[0].messages[0].content, "You are a petrochemical expert.");
        assert_eq!(seen[0].messages[1].role, ChatRole::User);
    }

    #[tokio::test]
    async fn test_llm_agent_surfaces_backend_error() {
        let spec = AgentSpec::new("legal", "prompt", "gpt-3.5-turbo", 0.2).unwrap();
        let agent = LlmAgent::new(spec, Arc::new(FailingBackend));
        let err = agent.run("contract").await.unwrap_err();
        assert!(matches!(err, AgentError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_llm_synthesizer_renders_template() {
        let backend = Arc::new(EchoBackend::default());
        let spec = AgentSpec::new("summary", "You are a senior legal counsel.", "gpt-4", 0.3).unwrap();
        let template = SynthesisTemplate::default()
            .with_section("legal", "Legal Terms Analysis")
            .with_section("financial", "Financial Risk Assessment");
        let synth = LlmSynthesizer::new(spec, template, backend.clone());

        let mut outputs = OutputMap::new();
        outputs.insert("legal".to_string(), "L".to_string());
        outputs.insert("financial".to_string(), "F".to_string());
        let out = synth
            .synthesize(&SynthesisRequest::new("contract", outputs))
            .await
            .unwrap();

        assert!(out.starts_with("echo:"));
        assert!(out.contains("Legal Terms Analysis:\nL\n"));
        assert!(out.contains("Financial Risk Assessment:\nF\n"));
        assert_eq!(backend.seen.lock().unwrap()[0].model, "gpt-4");
    }
}
