use crate::attestation_graph::domain::ImageReference;
use crate::ports::outbound::{
    AttestationVerifier, ProgressReporter, VerificationOutcome, VerifyOptions,
};
use crate::shared::Result;

/// VerifyAttestationUseCase - Passthrough verification of a signature
///
/// Delegates to the external tool via the AttestationVerifier port and
/// reports the verdict. A failed verification is an outcome, not an error,
/// so CI callers can branch on it without parsing stderr.
///
/// # Type Parameters
/// * `AV` - AttestationVerifier implementation
/// * `PR` - ProgressReporter implementation
pub struct VerifyAttestationUseCase<AV, PR> {
    verifier: AV,
    progress_reporter: PR,
}

impl<AV, PR> VerifyAttestationUseCase<AV, PR>
where
    AV: AttestationVerifier,
    PR: ProgressReporter,
{
    /// Creates a new VerifyAttestationUseCase with injected dependencies
    pub fn new(verifier: AV, progress_reporter: PR) -> Self {
        Self {
            verifier,
            progress_reporter,
        }
    }

    /// Runs verification for one image
    ///
    /// # Returns
    /// The tool's verdict. Operational failures of the tool itself are
    /// folded into a `success == false` outcome carrying the error text.
    pub async fn execute(
        &self,
        image: &ImageReference,
        options: &VerifyOptions,
    ) -> Result<VerificationOutcome> {
        self.progress_reporter.report(&format!(
            "🔏 Verifying {} attestation signature for {}",
            options.predicate_kind, image
        ));

        let outcome = match self.verifier.verify_attestation(image, options).await {
            Ok(outcome) => outcome,
            Err(e) => VerificationOutcome {
                success: false,
                output: e.to_string(),
            },
        };

        if outcome.success {
            self.progress_reporter
                .report_completion("✅ Attestation verified successfully");
        } else {
            self.progress_reporter
                .report_error("❌ Attestation verification failed");
        }

        Ok(outcome)
    }
}
