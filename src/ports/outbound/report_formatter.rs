use crate::attestation_graph::domain::{AttestationGraph, ReportMetadata, SecurityAssessment};
use crate::shared::Result;

/// ReportFormatter port for rendering the graph and its assessment
///
/// This port abstracts the output format (JSON, Markdown) so the
/// application layer stays independent of rendering concerns.
pub trait ReportFormatter {
    /// Renders a finished graph, its assessment and run metadata
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    fn format(
        &self,
        graph: &AttestationGraph,
        assessment: &SecurityAssessment,
        metadata: &ReportMetadata,
    ) -> Result<String>;
}
