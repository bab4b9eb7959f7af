use crate::attestation_graph::domain::{
    AttestationGraph, IssueKind, Node, NodeType, RiskLevel, SecurityAssessment, SecurityIssue,
    Severity, TrustLevel,
};
use serde_json::Value;

/// NodeRiskEvaluator service for scoring an individual graph node
///
/// Each node type triggers at most one check path, so the rules are
/// order-independent. The score starts at 100 and issues subtract points;
/// the final score is clamped to zero from below.
pub struct NodeRiskEvaluator;

impl NodeRiskEvaluator {
    pub fn assess(node: &Node, graph: &AttestationGraph) -> SecurityAssessment {
        let mut issues: Vec<SecurityIssue> = Vec::new();
        let mut score: i32 = 100;

        match node.node_type {
            NodeType::Image => {
                // An image with no outgoing edge has nothing attesting it.
                if graph.outgoing_edges(&node.id).next().is_none() {
                    issues.push(SecurityIssue::for_component(
                        IssueKind::UnsignedComponent,
                        Severity::High,
                        "Container image has no attestations or signatures.",
                        node.name.clone(),
                    ));
                    score -= 40;
                }
            }
            NodeType::Provenance => {
                if !Self::has_materials(node) {
                    issues.push(SecurityIssue::for_component(
                        IssueKind::MissingAttestation,
                        Severity::Medium,
                        "Provenance attestation lacks detailed material information.",
                        node.name.clone(),
                    ));
                    score -= 20;
                }
            }
            NodeType::SbomDocument => {
                if !Self::has_packages(node) {
                    issues.push(SecurityIssue::for_component(
                        IssueKind::MissingAttestation,
                        Severity::Medium,
                        "SBOM appears incomplete or malformed.",
                        node.name.clone(),
                    ));
                    score -= 25;
                }
            }
            NodeType::SourceCommit => {
                // Basic heuristic: sources outside the big public hosts get a
                // low-severity flag.
                if let Some(uri) = &node.uri {
                    if !uri.contains("github.com") && !uri.contains("gitlab.com") {
                        issues.push(SecurityIssue::for_component(
                            IssueKind::UnsignedComponent,
                            Severity::Low,
                            "Source code from unknown or private repository.",
                            node.name.clone(),
                        ));
                        score -= 10;
                    }
                }
            }
            _ => {}
        }

        let (trust_level, risk_level) = Self::levels_for_score(score);

        SecurityAssessment {
            trust_level,
            risk_level,
            score: score.max(0) as u8,
            issues,
            recommendations: Self::recommendations(node.node_type),
            vulnerability_summary: None,
        }
    }

    /// Band mapping for node scores. The lowest band pairs "unknown" trust
    /// with "critical" risk; that asymmetry is part of the contract, keep it.
    fn levels_for_score(score: i32) -> (TrustLevel, RiskLevel) {
        if score > 80 {
            (TrustLevel::Verified, RiskLevel::Low)
        } else if score > 60 {
            (TrustLevel::Partial, RiskLevel::Medium)
        } else if score > 30 {
            (TrustLevel::Untrusted, RiskLevel::High)
        } else {
            (TrustLevel::Unknown, RiskLevel::Critical)
        }
    }

    fn has_materials(node: &Node) -> bool {
        node.metadata
            .as_ref()
            .and_then(|metadata| metadata.get("materials"))
            .and_then(Value::as_array)
            .is_some_and(|materials| !materials.is_empty())
    }

    fn has_packages(node: &Node) -> bool {
        node.metadata
            .as_ref()
            .and_then(|metadata| metadata.get("packages"))
            .is_some_and(|packages| !packages.is_null())
    }

    fn recommendations(node_type: NodeType) -> Vec<String> {
        let advice: &[&str] = match node_type {
            NodeType::Image => &[
                "Scan container image for vulnerabilities before deployment.",
                "Use minimal base images to reduce attack surface.",
            ],
            NodeType::Provenance => &["Verify the build environment and source integrity."],
            NodeType::SbomDocument => &[
                "Review all components for known vulnerabilities.",
                "Ensure all licenses are compatible with your usage.",
            ],
            NodeType::SourceCommit => &["Verify the commit signature and author identity."],
            _ => &[],
        };
        advice.iter().map(|s| s.to_string()).collect()
    }
}
