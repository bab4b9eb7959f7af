use attest_graph::prelude::*;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Mock VulnerabilityProvider for testing
///
/// Returns a canned summary or fails; counts calls so tests can assert the
/// provider is skipped when it should be. Cloneable so the counter stays
/// observable after the use case takes ownership.
#[derive(Clone)]
pub struct MockVulnerabilityProvider {
    summary: Option<VulnerabilitySummary>,
    calls: Arc<AtomicUsize>,
}

impl MockVulnerabilityProvider {
    pub fn new(summary: VulnerabilitySummary) -> Self {
        Self {
            summary: Some(summary),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_failure() -> Self {
        Self {
            summary: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl VulnerabilityProvider for MockVulnerabilityProvider {
    async fn assess(&self, _graph: &AttestationGraph) -> Result<VulnerabilitySummary> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        match &self.summary {
            Some(summary) => Ok(summary.clone()),
            None => anyhow::bail!("mock vulnerability provider failure"),
        }
    }
}
