//! Fan-in vocabulary: `OutputMap`, `SynthesisRequest`, `SynthesisTemplate`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Agent name → produced text. Ordered so rendered prompts are stable.
pub type OutputMap = BTreeMap<String, String>;

/// Everything the synthesis agent sees: the original input and every
/// collected output, observed only after the fan-out barrier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisRequest {
    pub original_input: String,
    pub collected_outputs: OutputMap,
}

impl SynthesisRequest {
    pub fn new(original_input: impl Into<String>, collected_outputs: OutputMap) -> Self {
        Self {
            original_input: original_input.into(),
            collected_outputs,
        }
    }

    pub fn output(&self, agent: &str) -> Option<&str> {
        self.collected_outputs.get(agent).map(String::as_str)
    }
}

/// A titled block in the synthesis prompt, bound to one agent's output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisSection {
    pub agent: String,
    pub title: String,
    /// Rendered instead of the output when the agent has none.
    /// Defaults to `No <title> provided.`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
}

impl SynthesisSection {
    pub fn new(agent: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            agent: agent.into(),
            title: title.into(),
            fallback: None,
        }
    }

    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = Some(fallback.into());
        self
    }

    fn missing_text(&self) -> String {
        match &self.fallback {
            Some(text) => text.clone(),
            None => format!("No {} provided.", self.title),
        }
    }
}

/// Layout of the user message sent to the synthesis agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisTemplate {
    /// Opening line of the prompt.
    pub preamble: String,
    /// Heading wrapped around the original input block.
    pub input_label: String,
    /// Truncate the original input to this many characters.
    pub input_preview_chars: Option<usize>,
    /// Ordered sections; empty means "every collected output, by agent name".
    pub sections: Vec<SynthesisSection>,
    /// Trailing instruction line.
    pub closing_instruction: String,
}

impl Default for SynthesisTemplate {
    fn default() -> Self {
        Self {
            preamble: "Please synthesize the following analyses into a single consolidated report."
                .to_string(),
            input_label: "ORIGINAL INPUT".to_string(),
            input_preview_chars: None,
            sections: Vec::new(),
            closing_instruction:
                "Provide a consolidated summary identifying key issues and an overall assessment."
                    .to_string(),
        }
    }
}

impl SynthesisTemplate {
    pub fn with_preamble(mut self, preamble: impl Into<String>) -> Self {
        self.preamble = preamble.into();
        self
    }

    pub fn with_input_label(mut self, label: impl Into<String>) -> Self {
        self.input_label = label.into();
        self
    }

    pub fn with_input_preview(mut self, chars: usize) -> Self {
        self.input_preview_chars = Some(chars);
        self
    }

    pub fn with_section(mut self, agent: impl Into<String>, title: impl Into<String>) -> Self {
        self.sections.push(SynthesisSection::new(agent, title));
        self
    }

    /// Like [`SynthesisTemplate::with_section`] with custom text for a
    /// missing output.
    pub fn with_section_fallback(
        mut self,
        agent: impl Into<String>,
        title: impl Into<String>,
        fallback: impl Into<String>,
    ) -> Self {
        self.sections
            .push(SynthesisSection::new(agent, title).with_fallback(fallback));
        self
    }

    pub fn with_closing_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.closing_instruction = instruction.into();
        self
    }

    /// Render `request` into the synthesis user message.
    ///
    /// A section whose agent has no entry in the output map renders its
    /// fallback text rather than being dropped.
    pub fn render(&self, request: &SynthesisRequest) -> String {
        let mut out = String::new();
        push_line(&mut out, &self.preamble);

        let input = match self.input_preview_chars {
            Some(limit) => preview(&request.original_input, limit),
            None => request.original_input.clone(),
        };
        push_line(&mut out, &format!("--- BEGIN {} ---", self.input_label));
        push_line(&mut out, input.trim_end());
        push_line(&mut out, &format!("--- END {} ---", self.input_label));

        if self.sections.is_empty() {
            for (agent, output) in &request.collected_outputs {
                push_line(&mut out, &format!("{agent}:"));
                push_line(&mut out, output.trim_end());
            }
        } else {
            for section in &self.sections {
                push_line(&mut out, &format!("{}:", section.title));
                match request.output(&section.agent) {
                    Some(output) => push_line(&mut out, output.trim_end()),
                    None => push_line(&mut out, &section.missing_text()),
                }
            }
        }

        out.push_str(&self.closing_instruction);
        out
    }
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

/// First `limit` characters of `text`, with `...` appended when truncated.
pub fn preview(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
