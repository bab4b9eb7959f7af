use crate::attestation_graph::domain::{NodeType, RiskLevel};

/// A security concept tied to a node type, used for report annotations.
#[derive(Debug, Clone, Copy)]
pub struct SecurityConcept {
    pub term: &'static str,
    pub short_description: &'static str,
    pub actionable_advice: &'static str,
    pub inherent_risk: RiskLevel,
}

/// SecurityKnowledge policy: a fixed table of educational context per node
/// type. Pure data with no effect on scoring; the markdown formatter uses it
/// for per-node advice lines.
pub struct SecurityKnowledge;

impl SecurityKnowledge {
    pub fn concept_for(node_type: NodeType) -> Option<&'static SecurityConcept> {
        match node_type {
            NodeType::Provenance => Some(&SLSA_PROVENANCE),
            NodeType::SbomDocument => Some(&SBOM),
            NodeType::BuildConfig => Some(&BUILD_CONFIG),
            NodeType::Image => Some(&CONTAINER_IMAGE),
            NodeType::GenericAttestation => Some(&ATTESTATION),
            _ => None,
        }
    }

    /// Advice line for a node type, with a generic fallback for types the
    /// table does not cover.
    pub fn advice_for(node_type: NodeType) -> &'static str {
        Self::concept_for(node_type)
            .map(|concept| concept.actionable_advice)
            .unwrap_or("Review this component for security best practices.")
    }

    pub fn inherent_risk_for(node_type: NodeType) -> RiskLevel {
        Self::concept_for(node_type)
            .map(|concept| concept.inherent_risk)
            .unwrap_or(RiskLevel::Medium)
    }
}

static SLSA_PROVENANCE: SecurityConcept = SecurityConcept {
    term: "SLSA Provenance",
    short_description:
        "A record of how the software was built, providing transparency into the build process.",
    actionable_advice:
        "Look for builds from trusted repositories with verified identities. Missing provenance may indicate a security risk.",
    inherent_risk: RiskLevel::High,
};

static SBOM: SecurityConcept = SecurityConcept {
    term: "Software Bill of Materials (SBOM)",
    short_description:
        "A complete inventory of all components, libraries, and dependencies in the software.",
    actionable_advice:
        "Regularly scan SBOMs for vulnerabilities and outdated components. Ensure all dependencies have known licenses.",
    inherent_risk: RiskLevel::High,
};

static BUILD_CONFIG: SecurityConcept = SecurityConcept {
    term: "Build Configuration",
    short_description: "A declarative way to build secure, minimal container images.",
    actionable_advice: "Review the package list for unnecessary components. Minimal images are more secure.",
    inherent_risk: RiskLevel::Low,
};

static CONTAINER_IMAGE: SecurityConcept = SecurityConcept {
    term: "Container Image",
    short_description: "A packaged application with all its dependencies.",
    actionable_advice:
        "Regularly scan images for vulnerabilities, use minimal base images, and keep them updated.",
    inherent_risk: RiskLevel::Medium,
};

static ATTESTATION: SecurityConcept = SecurityConcept {
    term: "Attestation",
    short_description: "A cryptographically signed statement about software properties.",
    actionable_advice:
        "Always verify attestation signatures. Unsigned or unverified attestations provide no security guarantees.",
    inherent_risk: RiskLevel::Critical,
};
