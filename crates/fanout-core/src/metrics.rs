//! Global atomic counters for fanout runs.
//!
//! Counters are incremented silently at the call site. Call
//! [`Metrics::flush`] to emit current values as a single
//! `tracing::info!` event (e.g. at the end of a CLI run).

use std::sync::atomic::{AtomicU64, Ordering};

/// Global metrics singleton.
pub static METRICS: Metrics = Metrics::new();

pub struct Metrics {
    agent_calls: AtomicU64,
    agent_failures: AtomicU64,
    syntheses: AtomicU64,
    pipeline_stages: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            agent_calls: AtomicU64::new(0),
            agent_failures: AtomicU64::new(0),
            syntheses: AtomicU64::new(0),
            pipeline_stages: AtomicU64::new(0),
        }
    }

    /// One completion call issued by an `LlmAgent`.
    pub fn inc_agent_calls(&self) {
        self.agent_calls.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "agent_calls", "counter incremented");
    }

    /// One agent (fan-out branch or pipeline stage) that returned an error.
    pub fn inc_agent_failures(&self) {
        self.agent_failures.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "agent_failures", "counter incremented");
    }

    pub fn inc_syntheses(&self) {
        self.syntheses.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "syntheses", "counter incremented");
    }

    pub fn inc_pipeline_stages(&self) {
        self.pipeline_stages.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "pipeline_stages", "counter incremented");
    }

    /// Emit all current counter values as a single `info!` event.
    pub fn flush(&self) {
        tracing::info!(
            metric = "flush",
            agent_calls = self.agent_calls(),
            agent_failures = self.agent_failures(),
            syntheses = self.syntheses(),
            pipeline_stages = self.pipeline_stages(),
        );
    }

    pub fn agent_calls(&self) -> u64 {
        self.agent_calls.load(Ordering::Relaxed)
    }

    pub fn agent_failures(&self) -> u64 {
        self.agent_failures.load(Ordering::Relaxed)
    }

    pub fn syntheses(&self) -> u64 {
        self.syntheses.load(Ordering::Relaxed)
    }

    pub fn pipeline_stages(&self) -> u64 {
        self.pipeline_stages.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_increment() {
        let m = Metrics::new();
        assert_eq!(m.agent_calls(), 0);
        m.inc_agent_calls();
        m.inc_agent_calls();
        m.inc_agent_calls();
        assert_eq!(m.agent_calls(), 3);

        m.inc_agent_failures();
        assert_eq!(m.agent_failures(), 1);

        m.inc_syntheses();
        assert_eq!(m.syntheses(), 1);

        m.inc_pipeline_stages();
        m.inc_pipeline_stages();
        assert_eq!(m.pipeline_stages(), 2);
    }
}
