use crate::application::dto::GraphResponse;
use crate::shared::Result;
use async_trait::async_trait;

/// Raw, unvalidated request parameters as they arrive from a driving
/// adapter (CLI flags, HTTP query). Validation into domain types happens
/// behind the port.
#[derive(Debug, Clone)]
pub struct AssessmentRequest {
    /// Image reference, 1-500 characters
    pub image: String,
    /// OS/arch pair, e.g. "linux/amd64"
    pub platform: String,
    /// Whether to consult the vulnerability provider
    pub check_vulnerabilities: bool,
}

impl AssessmentRequest {
    pub fn new(image: String, platform: String, check_vulnerabilities: bool) -> Self {
        Self {
            image,
            platform,
            check_vulnerabilities,
        }
    }
}

/// GraphAssessmentPort - Inbound port for the graph/assessment use case
///
/// This port defines the interface that driving adapters (CLI, API, etc.)
/// use to trigger graph construction and risk assessment. It represents the
/// application's public API.
#[async_trait]
pub trait GraphAssessmentPort {
    /// Builds the attestation graph for an image and assesses it
    ///
    /// # Arguments
    /// * `request` - Raw request parameters; validated here before any
    ///   external call
    ///
    /// # Errors
    /// Returns an error if:
    /// - The image reference or platform is invalid
    /// - No attestation yields a subject digest for the image
    async fn assess_image(&self, request: AssessmentRequest) -> Result<GraphResponse>;
}
