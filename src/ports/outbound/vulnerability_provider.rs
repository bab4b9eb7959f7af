use crate::attestation_graph::domain::{AttestationGraph, VulnerabilitySummary};
use crate::shared::Result;
use async_trait::async_trait;

/// VulnerabilityProvider port for enriching an assessment with CVE data
///
/// This port abstracts the external vulnerability database. The lookup is
/// optional: a failure here degrades the assessment (no summary) and must
/// never abort the request.
#[async_trait]
pub trait VulnerabilityProvider: Send + Sync {
    /// Produces a vulnerability summary for the graph's SBOM contents
    ///
    /// # Arguments
    /// * `graph` - A finished graph; implementations read the SBOM node's
    ///   package inventory from it
    ///
    /// # Errors
    /// Returns an error if the provider is unreachable or returns an
    /// unusable response. Callers log and proceed without a summary.
    async fn assess(&self, graph: &AttestationGraph) -> Result<VulnerabilitySummary>;
}
