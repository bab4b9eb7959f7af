use crate::attestation_graph::domain::{AttestationGraph, ReportMetadata, SecurityAssessment};

/// GraphResponse - Internal response DTO from the graph/assessment use case
///
/// The graph and the assessment are independent, serializable outputs; the
/// assessment is always computed from the finished graph, never
/// incrementally. Formatters render this into the requested output format.
#[derive(Debug, Clone)]
pub struct GraphResponse {
    pub graph: AttestationGraph,
    pub assessment: SecurityAssessment,
    pub metadata: ReportMetadata,
}

impl GraphResponse {
    pub fn new(
        graph: AttestationGraph,
        assessment: SecurityAssessment,
        metadata: ReportMetadata,
    ) -> Self {
        Self {
            graph,
            assessment,
            metadata,
        }
    }
}
