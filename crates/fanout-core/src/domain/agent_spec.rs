//! Agent specification: the data that turns a generic agent into a
//! legal reviewer, a market analyst, or a synthesizer.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::error::{FanoutError, Result};

/// Placeholder substituted with the task input inside an `input_template`.
pub const INPUT_PLACEHOLDER: &str = "{input}";

/// Immutable description of one agent.
///
/// Agents are data: adding a new analyst means constructing a new
/// `AgentSpec`, not writing a new type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "AgentSpecFields", into = "AgentSpecFields")]
pub struct AgentSpec {
    name: String,
    role_prompt: String,
    model_id: String,
    temperature: f32,
    input_template: Option<String>,
}

/// Raw serialized form of an [`AgentSpec`], validated on conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSpecFields {
    pub name: String,
    pub role_prompt: String,
    pub model_id: String,
    pub temperature: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_template: Option<String>,
}

impl AgentSpec {
    /// Create a validated spec.
    pub fn new(
        name: impl Into<String>,
        role_prompt: impl Into<String>,
        model_id: impl Into<String>,
        temperature: f32,
    ) -> Result<Self> {
        Self::try_from(AgentSpecFields {
            name: name.into(),
            role_prompt: role_prompt.into(),
            model_id: model_id.into(),
            temperature,
            input_template: None,
        })
    }

    /// Wrap every input in `template` before it is sent as the user message.
    ///
    /// The template must contain [`INPUT_PLACEHOLDER`].
    pub fn with_input_template(mut self, template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        validate_template(&template)?;
        self.input_template = Some(template);
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role_prompt(&self) -> &str {
        &self.role_prompt
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn input_template(&self) -> Option<&str> {
        self.input_template.as_deref()
    }

    /// Build the user message for `input`.
    pub fn render_input(&self, input: &str) -> String {
        match &self.input_template {
            Some(template) => template.replace(INPUT_PLACEHOLDER, input),
            None => input.to_string(),
        }
    }
}

impl TryFrom<AgentSpecFields> for AgentSpec {
    type Error = FanoutError;

    fn try_from(fields: AgentSpecFields) -> Result<Self> {
        if fields.name.trim().is_empty() {
            return Err(FanoutError::InvalidAgentSpec(
                "name cannot be empty".to_string(),
            ));
        }
        if fields.model_id.trim().is_empty() {
            return Err(FanoutError::InvalidAgentSpec(format!(
                "agent {}: model_id cannot be empty",
                fields.name
            )));
        }
        if !(0.0..=2.0).contains(&fields.temperature) {
            return Err(FanoutError::InvalidAgentSpec(format!(
                "agent {}: temperature {} outside 0.0..=2.0",
                fields.name, fields.temperature
            )));
        }
        if let Some(template) = &fields.input_template {
            validate_template(template)?;
        }

        Ok(Self {
            name: fields.name,
            role_prompt: fields.role_prompt,
            model_id: fields.model_id,
            temperature: fields.temperature,
            input_template: fields.input_template,
        })
    }
}

impl From<AgentSpec> for AgentSpecFields {
    fn from(spec: AgentSpec) -> Self {
        Self {
            name: spec.name,
            role_prompt: spec.role_prompt,
            model_id: spec.model_id,
            temperature: spec.temperature,
            input_template: spec.input_template,
        }
    }
}

fn validate_template(template: &str) -> Result<()> {
    if !template.contains(INPUT_PLACEHOLDER) {
        return Err(FanoutError::InvalidAgentSpec(format!(
            "input template must contain {INPUT_PLACEHOLDER}"
        )));
    }
    Ok(())
}

/// Reject rosters in which two agents share a name.
///
/// Agent names key the output map, so a duplicate would silently drop one
/// agent's analysis.
pub fn ensure_unique_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(FanoutError::DuplicateAgent(name.to_string()));
        }
    }
    Ok(())
}
