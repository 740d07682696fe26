//! Domain types: agent specs, the output map and the synthesis request.

pub mod agent_spec;
pub mod error;
pub mod synthesis;

pub use agent_spec::{ensure_unique_names, AgentSpec, AgentSpecFields, INPUT_PLACEHOLDER};
pub use error::{FanoutError, Result};
pub use synthesis::{preview, OutputMap, SynthesisRequest, SynthesisSection, SynthesisTemplate};
