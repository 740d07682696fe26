//! Closure-backed agents, for deterministic stubs and local transforms.

use std::future::Future;

use async_trait::async_trait;

use super::error::AgentResult;
use super::{Agent, Synthesizer};
use crate::domain::SynthesisRequest;

/// An [`Agent`] whose behaviour is an async closure `String -> AgentResult<String>`.
pub struct FnAgent<F> {
    name: String,
    func: F,
}

impl<F, Fut> FnAgent<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = AgentResult<String>> + Send + 'static,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

#[async_trait]
impl<F, Fut> Agent for FnAgent<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = AgentResult<String>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, input: &str) -> AgentResult<String> {
        (self.func)(input.to_string()).await
    }
}

/// A [`Synthesizer`] whose behaviour is an async closure over the request.
pub struct FnSynthesizer<F> {
    name: String,
    func: F,
}

impl<F, Fut> FnSynthesizer<F>
where
    F: Fn(SynthesisRequest) -> Fut + Send + Sync,
    Fut: Future<Output = AgentResult<String>> + Send + 'static,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

#[async_trait]
impl<F, Fut> Synthesizer for FnSynthesizer<F>
where
    F: Fn(SynthesisRequest) -> Fut + Send + Sync,
    Fut: Future<Output = AgentResult<String>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn synthesize(&self, request: &SynthesisRequest) -> AgentResult<String> {
        (self.func)(request.clone()).await
    }
}
