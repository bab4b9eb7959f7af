use super::node_evaluator::NodeRiskEvaluator;
use crate::attestation_graph::domain::{
    AttestationGraph, IssueKind, NodeType, RiskLevel, SecurityAssessment, SecurityIssue, Severity,
    TrustLevel, VulnerabilitySummary,
};
use std::collections::HashSet;

/// Recommendations are capped at this many entries, priority order preserved.
const MAX_RECOMMENDATIONS: usize = 8;

/// GraphRiskAggregator service for the whole-graph verdict
///
/// Combines attestation coverage, per-node assessments and the optional
/// external vulnerability summary into one assessment. Deductions are
/// additive and overlap (a missing SBOM costs points here AND lowers the
/// node fold); collapsing them into one formula changes observable scores.
pub struct GraphRiskAggregator;

impl GraphRiskAggregator {
    pub fn assess(
        graph: &AttestationGraph,
        vulnerabilities: Option<VulnerabilitySummary>,
    ) -> SecurityAssessment {
        let mut issues: Vec<SecurityIssue> = Vec::new();
        let mut total_score: f64 = 100.0;

        let has_provenance = graph.has_node_type(NodeType::Provenance);
        let has_sbom = graph.has_node_type(NodeType::SbomDocument);

        if !has_provenance {
            issues.push(SecurityIssue::for_component(
                IssueKind::MissingAttestation,
                Severity::High,
                "No SLSA provenance attestation found. This means the build process cannot be verified.",
                "Build Process",
            ));
            total_score -= 30.0;
        }

        if !has_sbom {
            issues.push(SecurityIssue::for_component(
                IssueKind::MissingAttestation,
                Severity::Medium,
                "No SBOM (Software Bill of Materials) found. Component inventory is unknown.",
                "Dependencies",
            ));
            total_score -= 20.0;
        }

        if let Some(summary) = &vulnerabilities {
            total_score -= Self::apply_vulnerability_issues(summary, &mut issues);
        }

        // Fold every node's assessment into the aggregate: issues are
        // collected, and the score is pulled toward the worst node by each
        // node's deficit divided by the node count. Iteration is graph
        // insertion order; keep it that way for reproducible scores.
        let node_count = graph.nodes.len() as f64;
        for node in &graph.nodes {
            let node_assessment = NodeRiskEvaluator::assess(node, graph);
            issues.extend(node_assessment.issues);
            let deficit = (100.0 - f64::from(node_assessment.score)) / node_count;
            total_score = total_score.min(total_score - deficit);
        }

        let trust_level =
            Self::trust_level(&issues, has_provenance, has_sbom, vulnerabilities.as_ref());
        let risk_level = Self::risk_level(&issues, total_score, vulnerabilities.as_ref());
        let recommendations =
            Self::recommendations(&issues, has_provenance, has_sbom, vulnerabilities.as_ref());

        SecurityAssessment {
            trust_level,
            risk_level,
            score: total_score.round().clamp(0.0, 100.0) as u8,
            issues,
            recommendations,
            vulnerability_summary: vulnerabilities,
        }
    }

    /// Issue and deduction rules for the external vulnerability summary.
    /// Returns the total deduction.
    fn apply_vulnerability_issues(
        summary: &VulnerabilitySummary,
        issues: &mut Vec<SecurityIssue>,
    ) -> f64 {
        let mut deduction = 0.0;

        if summary.critical_count > 0 {
            issues.push(SecurityIssue::for_component(
                IssueKind::Vulnerability,
                Severity::Critical,
                format!(
                    "{} critical vulnerabilities found in dependencies.",
                    summary.critical_count
                ),
                "Dependencies",
            ));
            deduction += 40.0;
        }

        if summary.high_count > 0 {
            issues.push(SecurityIssue::for_component(
                IssueKind::Vulnerability,
                Severity::High,
                format!(
                    "{} high-severity vulnerabilities found in dependencies.",
                    summary.high_count
                ),
                "Dependencies",
            ));
            deduction += f64::min(25.0, summary.high_count as f64 * 5.0);
        }

        if summary.medium_count > 3 {
            issues.push(SecurityIssue::for_component(
                IssueKind::Vulnerability,
                Severity::Medium,
                format!(
                    "{} medium-severity vulnerabilities found in dependencies.",
                    summary.medium_count
                ),
                "Dependencies",
            ));
            deduction += f64::min(15.0, summary.medium_count as f64 * 2.0);
        }

        // Smoothing term: the provider's overall risk always contributes.
        deduction += (f64::from(summary.overall_risk_score) / 100.0 * 20.0).round();

        deduction
    }

    /// Trust ladder. Evaluated in the stated order; first match wins.
    fn trust_level(
        issues: &[SecurityIssue],
        has_provenance: bool,
        has_sbom: bool,
        vulnerabilities: Option<&VulnerabilitySummary>,
    ) -> TrustLevel {
        let critical_issues = Self::count_severity(issues, Severity::Critical);
        let high_issues = Self::count_severity(issues, Severity::High);

        if vulnerabilities.is_some_and(|v| v.critical_count > 0) {
            return TrustLevel::Untrusted;
        }
        if critical_issues > 0 {
            return TrustLevel::Untrusted;
        }
        if vulnerabilities.is_some_and(|v| v.high_count > 3) {
            return TrustLevel::Untrusted;
        }
        if high_issues > 2 {
            return TrustLevel::Untrusted;
        }
        if !has_provenance && !has_sbom {
            return TrustLevel::Untrusted;
        }

        // Verified requires both attestations and no critical/high findings.
        if has_provenance
            && has_sbom
            && high_issues == 0
            && vulnerabilities.is_none_or(|v| v.critical_count == 0 && v.high_count == 0)
        {
            return TrustLevel::Verified;
        }

        if (has_provenance || has_sbom)
            && high_issues <= 1
            && vulnerabilities.is_none_or(|v| v.critical_count == 0)
        {
            return TrustLevel::Partial;
        }

        TrustLevel::Unknown
    }

    /// Risk ladder over the UNCLAMPED running score. Order matters; first
    /// match wins.
    fn risk_level(
        issues: &[SecurityIssue],
        score: f64,
        vulnerabilities: Option<&VulnerabilitySummary>,
    ) -> RiskLevel {
        let critical_issues = Self::count_severity(issues, Severity::Critical);
        let high_issues = Self::count_severity(issues, Severity::High);

        if critical_issues > 0
            || score < 30.0
            || vulnerabilities.is_some_and(|v| v.critical_count > 0)
        {
            return RiskLevel::Critical;
        }

        if high_issues > 1
            || score < 50.0
            || vulnerabilities.is_some_and(|v| v.high_count > 2 || v.overall_risk_score > 75)
        {
            return RiskLevel::High;
        }

        if high_issues > 0
            || score < 80.0
            || vulnerabilities.is_some_and(|v| v.high_count > 0 || v.medium_count > 5)
        {
            return RiskLevel::Medium;
        }

        RiskLevel::Low
    }

    /// Assembles the recommendation list in priority order:
    /// provider actions, missing-attestation advice, issue-kind advice
    /// (deduplicated by kind), scanning-process advice, then generic
    /// fallbacks when nothing else applied. Truncated to eight entries.
    fn recommendations(
        issues: &[SecurityIssue],
        has_provenance: bool,
        has_sbom: bool,
        vulnerabilities: Option<&VulnerabilitySummary>,
    ) -> Vec<String> {
        let mut recommendations: Vec<String> = Vec::new();

        if let Some(summary) = vulnerabilities {
            recommendations.extend(summary.recommended_actions.iter().cloned());
        }

        if !has_provenance {
            recommendations.push(
                "Implement SLSA provenance in your build process to verify software origins."
                    .to_string(),
            );
        }

        if !has_sbom {
            recommendations.push(
                "Generate and attach SBOMs to track all software components and dependencies."
                    .to_string(),
            );
        }

        let issue_kinds: HashSet<IssueKind> = issues.iter().map(|issue| issue.kind).collect();

        if issue_kinds.contains(&IssueKind::UnsignedComponent) {
            recommendations.push(
                "Sign all software artifacts and verify signatures before deployment.".to_string(),
            );
        }

        if issue_kinds.contains(&IssueKind::Vulnerability) && vulnerabilities.is_none() {
            recommendations.push(
                "Scan for vulnerabilities regularly and prioritize fixing critical/high severity issues."
                    .to_string(),
            );
        }

        if issue_kinds.contains(&IssueKind::OutdatedDependency) {
            recommendations
                .push("Keep dependencies updated and monitor for security updates.".to_string());
        }

        if vulnerabilities.is_some_and(|v| v.total_vulnerabilities > 0) {
            recommendations.push(
                "Implement automated vulnerability scanning in your CI/CD pipeline.".to_string(),
            );
            recommendations.push(
                "Set up security alerts for new vulnerabilities in your dependencies.".to_string(),
            );
        }

        if recommendations.is_empty() {
            recommendations.push(
                "Continue following security best practices and monitor for new vulnerabilities."
                    .to_string(),
            );
            recommendations.push(
                "Consider implementing additional security measures like dependency pinning."
                    .to_string(),
            );
        }

        recommendations.truncate(MAX_RECOMMENDATIONS);
        recommendations
    }

    fn count_severity(issues: &[SecurityIssue], severity: Severity) -> usize {
        issues
            .iter()
            .filter(|issue| issue.severity == severity)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attestation_graph::domain::{Edge, Node, PredicateSet};
    use serde_json::json;

    fn fully_attested_graph() -> AttestationGraph {
        let nodes = vec![
            Node::new("sha256:abc", NodeType::Image, "nginx:latest"),
            Node::new("att-slsa", NodeType::Provenance, "SLSA v1 Provenance")
                .with_metadata(json!({"materials": [{"uri": "git+https://github.com/o/r"}]})),
            Node::new("mat-0", NodeType::SourceCommit, "git+https://github.com/o/r")
                .with_uri("git+https://github.com/o/r"),
            Node::new("att-sbom", NodeType::SbomDocument, "SBOM (SPDX)")
                .with_metadata(json!({"packages": []})),
        ];
        let edges = vec![
            Edge::new("e-root-slsa", "sha256:abc", "att-slsa", "attests"),
            Edge::new("e-slsa-0", "att-slsa", "mat-0", "built from"),
            Edge::new("e-root-sbom", "sha256:abc", "att-sbom", "describes"),
        ];
        AttestationGraph::new("sha256:abc".to_string(), nodes, edges, PredicateSet::empty())
    }

    fn image_only_graph() -> AttestationGraph {
        AttestationGraph::new(
            "sha256:abc".to_string(),
            vec![Node::new("sha256:abc", NodeType::Image, "nginx:latest")],
            vec![],
            PredicateSet::empty(),
        )
    }

    fn summary(critical: usize, high: usize, medium: usize, overall: u8) -> VulnerabilitySummary {
        VulnerabilitySummary {
            critical_count: critical,
            high_count: high,
            medium_count: medium,
            low_count: 0,
            total_vulnerabilities: critical + high + medium,
            overall_risk_score: overall,
            recommended_actions: vec![],
        }
    }

    #[test]
    fn test_fully_attested_clean_graph_is_verified() {
        let assessment = GraphRiskAggregator::assess(&fully_attested_graph(), None);

        assert_eq!(assessment.trust_level, TrustLevel::Verified);
        assert_eq!(assessment.risk_level, RiskLevel::Low);
        assert_eq!(assessment.score, 100);
        assert!(assessment.issues.is_empty());
    }

    #[test]
    fn test_missing_both_attestations_is_untrusted() {
        let assessment = GraphRiskAggregator::assess(&image_only_graph(), None);

        // -30 (no provenance) -20 (no SBOM), then the unsigned image node
        // (score 60) pulls the fold down by 40 with a single node.
        assert_eq!(assessment.score, 10);
        assert_eq!(assessment.trust_level, TrustLevel::Untrusted);
        assert_eq!(assessment.risk_level, RiskLevel::Critical);
        assert_eq!(assessment.issues.len(), 3);
    }

    #[test]
    fn test_critical_vulnerability_forces_untrusted_critical() {
        let mut vuln = summary(1, 0, 0, 80);
        vuln.recommended_actions = vec!["Update curl to 8.7.1".to_string()];

        let assessment = GraphRiskAggregator::assess(&fully_attested_graph(), Some(vuln));

        assert_eq!(assessment.trust_level, TrustLevel::Untrusted);
        assert_eq!(assessment.risk_level, RiskLevel::Critical);
        // -40 critical, -16 smoothing (round(80/100*20)).
        assert_eq!(assessment.score, 44);
        assert_eq!(assessment.recommendations[0], "Update curl to 8.7.1");
    }

    #[test]
    fn test_high_vulnerability_deduction_is_capped() {
        let assessment =
            GraphRiskAggregator::assess(&fully_attested_graph(), Some(summary(0, 10, 0, 0)));

        // min(25, 10*5) = 25; no smoothing at overall 0.
        assert_eq!(assessment.score, 75);
        assert_eq!(assessment.trust_level, TrustLevel::Untrusted);
    }

    #[test]
    fn test_medium_vulnerabilities_only_counted_above_three() {
        let below = GraphRiskAggregator::assess(&fully_attested_graph(), Some(summary(0, 0, 3, 0)));
        assert_eq!(below.score, 100);
        assert!(below.issues.is_empty());

        let above = GraphRiskAggregator::assess(&fully_attested_graph(), Some(summary(0, 0, 4, 0)));
        // min(15, 4*2) = 8
        assert_eq!(above.score, 92);
        assert_eq!(above.issues.len(), 1);
    }

    #[test]
    fn test_score_is_clamped_to_zero() {
        let assessment =
            GraphRiskAggregator::assess(&image_only_graph(), Some(summary(5, 10, 10, 100)));

        assert_eq!(assessment.score, 0);
        assert_eq!(assessment.risk_level, RiskLevel::Critical);
    }

    #[test]
    fn test_partial_trust_with_provenance_only() {
        let nodes = vec![
            Node::new("sha256:abc", NodeType::Image, "nginx:latest"),
            Node::new("att-slsa", NodeType::Provenance, "SLSA v1 Provenance")
                .with_metadata(json!({"materials": [{"uri": "git+https://github.com/o/r"}]})),
        ];
        let edges = vec![Edge::new("e-root-slsa", "sha256:abc", "att-slsa", "attests")];
        let graph =
            AttestationGraph::new("sha256:abc".to_string(), nodes, edges, PredicateSet::empty());

        let assessment = GraphRiskAggregator::assess(&graph, None);

        // Only the missing-SBOM deduction applies: 100 - 20 = 80.
        assert_eq!(assessment.score, 80);
        assert_eq!(assessment.trust_level, TrustLevel::Partial);
        // 80 is not < 80 and there are no high issues: medium band not hit.
        assert_eq!(assessment.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_node_issues_are_folded_into_aggregate() {
        let assessment = GraphRiskAggregator::assess(&image_only_graph(), None);

        assert!(assessment
            .issues
            .iter()
            .any(|issue| issue.kind == IssueKind::UnsignedComponent));
    }

    #[test]
    fn test_recommendations_capped_at_eight_with_actions_first() {
        let mut vuln = summary(1, 4, 10, 90);
        vuln.recommended_actions = (1..=6).map(|i| format!("Action {}", i)).collect();

        let assessment = GraphRiskAggregator::assess(&image_only_graph(), Some(vuln));

        assert_eq!(assessment.recommendations.len(), 8);
        assert_eq!(assessment.recommendations[0], "Action 1");
        assert_eq!(assessment.recommendations[5], "Action 6");
        // Provider actions lead; missing-attestation advice follows.
        assert!(assessment.recommendations[6].contains("SLSA provenance"));
    }

    #[test]
    fn test_fallback_recommendations_when_clean() {
        let assessment = GraphRiskAggregator::assess(&fully_attested_graph(), None);

        assert_eq!(assessment.recommendations.len(), 2);
        assert!(assessment.recommendations[0].contains("security best practices"));
    }

    #[test]
    fn test_scanning_advice_requires_vulnerabilities() {
        let clean = GraphRiskAggregator::assess(&fully_attested_graph(), Some(summary(0, 0, 0, 0)));
        assert!(!clean
            .recommendations
            .iter()
            .any(|r| r.contains("CI/CD pipeline")));

        let dirty = GraphRiskAggregator::assess(&fully_attested_graph(), Some(summary(0, 1, 0, 0)));
        assert!(dirty
            .recommendations
            .iter()
            .any(|r| r.contains("CI/CD pipeline")));
    }

    #[test]
    fn test_overall_risk_smoothing_term() {
        let assessment =
            GraphRiskAggregator::assess(&fully_attested_graph(), Some(summary(0, 0, 0, 50)));

        // round(50/100 * 20) = 10, applied even with zero findings.
        assert_eq!(assessment.score, 90);
    }

    #[test]
    fn test_high_vuln_count_above_three_is_untrusted() {
        let assessment =
            GraphRiskAggregator::assess(&fully_attested_graph(), Some(summary(0, 4, 0, 0)));
        assert_eq!(assessment.trust_level, TrustLevel::Untrusted);
    }

    #[test]
    fn test_overall_risk_above_75_is_high_risk() {
        let assessment =
            GraphRiskAggregator::assess(&fully_attested_graph(), Some(summary(0, 0, 0, 80)));
        assert_eq!(assessment.risk_level, RiskLevel::High);
    }
}
