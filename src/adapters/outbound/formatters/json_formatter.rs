use crate::attestation_graph::domain::{AttestationGraph, ReportMetadata, SecurityAssessment};
use crate::ports::outbound::ReportFormatter;
use crate::shared::Result;

/// JsonFormatter adapter for the machine-readable report
///
/// This adapter implements the ReportFormatter port for JSON format. The
/// top-level shape is the graph payload (root, nodes, edges, raw) plus the
/// assessment and run metadata.
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for JsonFormatter {
    fn format(
        &self,
        graph: &AttestationGraph,
        assessment: &SecurityAssessment,
        metadata: &ReportMetadata,
    ) -> Result<String> {
        let report = serde_json::json!({
            "root": graph.root,
            "nodes": graph.nodes,
            "edges": graph.edges,
            "raw": graph.raw,
            "assessment": assessment,
            "meta": metadata,
        });

        let mut output = serde_json::to_string_pretty(&report)?;
        output.push('\n');
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attestation_graph::domain::{
        ImageReference, Node, NodeType, Platform, PredicateSet, RiskLevel, TrustLevel,
    };
    use crate::attestation_graph::services::GraphRiskAggregator;

    fn sample() -> (AttestationGraph, SecurityAssessment, ReportMetadata) {
        let graph = AttestationGraph::new(
            "sha256:abc".to_string(),
            vec![Node::new("sha256:abc", NodeType::Image, "nginx:latest")],
            vec![],
            PredicateSet::empty(),
        );
        let assessment = GraphRiskAggregator::assess(&graph, None);
        let metadata = ReportMetadata::generate(
            ImageReference::new("nginx:latest".to_string()).unwrap(),
            Platform::LinuxAmd64,
            &graph.raw,
        );
        (graph, assessment, metadata)
    }

    #[test]
    fn test_json_report_shape() {
        let (graph, assessment, metadata) = sample();
        let output = JsonFormatter::new()
            .format(&graph, &assessment, &metadata)
            .unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["root"], "sha256:abc");
        assert!(parsed["nodes"].is_array());
        assert!(parsed["edges"].is_array());
        assert!(parsed["raw"]["slsa"].is_null());
        assert_eq!(parsed["assessment"]["trustLevel"], "untrusted");
        assert_eq!(parsed["meta"]["platform"], "linux/amd64");
        assert_eq!(parsed["meta"]["attestationCounts"]["sbom"], 0);
    }

    #[test]
    fn test_json_report_assessment_fields() {
        let (graph, assessment, metadata) = sample();
        assert_eq!(assessment.trust_level, TrustLevel::Untrusted);
        assert_eq!(assessment.risk_level, RiskLevel::Critical);

        let output = JsonFormatter::new()
            .format(&graph, &assessment, &metadata)
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["assessment"]["score"], 10);
        assert!(parsed["assessment"]["recommendations"].is_array());
    }
}
