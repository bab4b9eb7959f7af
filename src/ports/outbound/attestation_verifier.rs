use crate::attestation_graph::domain::{ImageReference, PredicateKind};
use crate::shared::Result;
use async_trait::async_trait;

/// Options for a verification run, passed through to the external tool.
#[derive(Debug, Clone)]
pub struct VerifyOptions {
    /// Predicate kind whose attestation is verified
    pub predicate_kind: PredicateKind,
    /// Required signing certificate identity
    pub certificate_identity: String,
    /// Required OIDC issuer of the signing certificate
    pub certificate_oidc_issuer: String,
}

/// Result of a verification run. Failure to verify is an outcome, not an
/// error: only operational problems (tool missing, timeout) are errors.
#[derive(Debug, Clone)]
pub struct VerificationOutcome {
    pub success: bool,
    /// The tool's own output, surfaced verbatim
    pub output: String,
}

/// AttestationVerifier port for cryptographic verification passthrough
///
/// Verification is entirely delegated to the external tool; this port only
/// carries its verdict. No signature checking happens in this crate.
#[async_trait]
pub trait AttestationVerifier: Send + Sync {
    /// Verifies an attestation signature for the image
    ///
    /// # Errors
    /// Returns an error only for operational failures of the external tool;
    /// a failed verification is a `VerificationOutcome` with
    /// `success == false`.
    async fn verify_attestation(
        &self,
        image: &ImageReference,
        options: &VerifyOptions,
    ) -> Result<VerificationOutcome>;
}
