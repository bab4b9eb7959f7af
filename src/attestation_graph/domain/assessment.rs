use serde::{Deserialize, Serialize};

/// Qualitative confidence band derived from attestation coverage and issue
/// severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrustLevel {
    Verified,
    Partial,
    Untrusted,
    Unknown,
}

impl TrustLevel {
    pub fn label(&self) -> &'static str {
        match self {
            TrustLevel::Verified => "Verified",
            TrustLevel::Partial => "Partially Trusted",
            TrustLevel::Untrusted => "Untrusted",
            TrustLevel::Unknown => "Unknown",
        }
    }
}

/// Qualitative exposure band derived from score and vulnerability counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low Risk",
            RiskLevel::Medium => "Medium Risk",
            RiskLevel::High => "High Risk",
            RiskLevel::Critical => "Critical Risk",
        }
    }
}

/// Severity of an individual security issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// Kind of finding an issue reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    MissingAttestation,
    UnsignedComponent,
    OutdatedDependency,
    Vulnerability,
    LicenseIssue,
}

/// A single security finding. Pure value, no identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityIssue {
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub severity: Severity,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
}

impl SecurityIssue {
    pub fn new(kind: IssueKind, severity: Severity, description: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            description: description.into(),
            component: None,
        }
    }

    pub fn for_component(
        kind: IssueKind,
        severity: Severity,
        description: impl Into<String>,
        component: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            severity,
            description: description.into(),
            component: Some(component.into()),
        }
    }
}

/// External vulnerability summary for a graph, produced by the vulnerability
/// provider. Optional input to the risk aggregator; its absence is never an
/// error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VulnerabilitySummary {
    pub critical_count: usize,
    pub high_count: usize,
    pub medium_count: usize,
    pub low_count: usize,
    pub total_vulnerabilities: usize,
    /// Aggregate exposure, 0 (clean) to 100 (worst)
    pub overall_risk_score: u8,
    pub recommended_actions: Vec<String>,
}

/// Trust/risk verdict for a node or for a whole graph.
///
/// Produced fresh per graph; never persisted or merged across requests.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityAssessment {
    pub trust_level: TrustLevel,
    pub risk_level: RiskLevel,
    /// 0-100, higher is better
    pub score: u8,
    pub issues: Vec<SecurityIssue>,
    pub recommendations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vulnerability_summary: Option<VulnerabilitySummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(
            serde_json::to_string(&TrustLevel::Untrusted).unwrap(),
            "\"untrusted\""
        );
        assert_eq!(
            serde_json::to_string(&RiskLevel::Critical).unwrap(),
            "\"critical\""
        );
        assert_eq!(
            serde_json::to_string(&IssueKind::MissingAttestation).unwrap(),
            "\"missing_attestation\""
        );
        assert_eq!(
            serde_json::to_string(&Severity::Medium).unwrap(),
            "\"medium\""
        );
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
    }

    #[test]
    fn test_assessment_serializes_camel_case() {
        let assessment = SecurityAssessment {
            trust_level: TrustLevel::Partial,
            risk_level: RiskLevel::Medium,
            score: 70,
            issues: vec![SecurityIssue::for_component(
                IssueKind::UnsignedComponent,
                Severity::High,
                "Container image has no attestations or signatures.",
                "nginx:latest",
            )],
            recommendations: vec!["Sign all software artifacts.".to_string()],
            vulnerability_summary: None,
        };
        let json = serde_json::to_value(&assessment).unwrap();
        assert_eq!(json["trustLevel"], "partial");
        assert_eq!(json["riskLevel"], "medium");
        assert_eq!(json["issues"][0]["type"], "unsigned_component");
        assert_eq!(json["issues"][0]["component"], "nginx:latest");
        assert!(json.get("vulnerabilitySummary").is_none());
    }

    #[test]
    fn test_vulnerability_summary_round_trip() {
        let raw = r#"{
            "criticalCount": 1,
            "highCount": 2,
            "mediumCount": 0,
            "lowCount": 4,
            "totalVulnerabilities": 7,
            "overallRiskScore": 55,
            "recommendedActions": ["Update curl to 8.7.1"]
        }"#;
        let summary: VulnerabilitySummary = serde_json::from_str(raw).unwrap();
        assert_eq!(summary.critical_count, 1);
        assert_eq!(summary.overall_risk_score, 55);
        assert_eq!(summary.recommended_actions.len(), 1);
    }
}
