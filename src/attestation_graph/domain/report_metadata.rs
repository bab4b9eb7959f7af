use super::image_ref::{ImageReference, Platform};
use super::predicate::PredicateSet;
use serde::Serialize;

/// Per-source attestation coverage counts included in every report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AttestationCounts {
    pub slsa: usize,
    pub sbom: usize,
    pub apko: usize,
}

impl AttestationCounts {
    pub fn from_predicates(predicates: &PredicateSet) -> Self {
        Self {
            slsa: usize::from(predicates.provenance.is_retrieved()),
            sbom: usize::from(predicates.sbom.is_retrieved()),
            apko: usize::from(predicates.build_config.is_retrieved()),
        }
    }
}

/// ReportMetadata value object describing one graph/assessment run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    image: ImageReference,
    platform: Platform,
    timestamp: String,
    serial_number: String,
    attestation_counts: AttestationCounts,
}

impl ReportMetadata {
    pub fn new(
        image: ImageReference,
        platform: Platform,
        timestamp: String,
        serial_number: String,
        attestation_counts: AttestationCounts,
    ) -> Self {
        Self {
            image,
            platform,
            timestamp,
            serial_number,
            attestation_counts,
        }
    }

    /// Builds metadata stamped with the current time and a fresh serial
    /// number.
    pub fn generate(image: ImageReference, platform: Platform, predicates: &PredicateSet) -> Self {
        Self::new(
            image,
            platform,
            chrono::Utc::now().to_rfc3339(),
            format!("urn:uuid:{}", uuid::Uuid::new_v4()),
            AttestationCounts::from_predicates(predicates),
        )
    }

    pub fn image(&self) -> &ImageReference {
        &self.image
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn serial_number(&self) -> &str {
        &self.serial_number
    }

    pub fn attestation_counts(&self) -> AttestationCounts {
        self.attestation_counts
    }
}
