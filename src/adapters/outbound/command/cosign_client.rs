use crate::attestation_graph::domain::{ImageReference, Platform, PredicateKind};
use crate::ports::outbound::{
    AttestationProvider, AttestationVerifier, VerificationOutcome, VerifyOptions,
};
use crate::shared::error::AttestError;
use crate::shared::Result;
use async_trait::async_trait;
use std::time::Duration;
use tokio::process::Command;

/// Cosign CLI client implementing the attestation provider and verifier
/// ports
///
/// All cryptography stays inside cosign; this adapter only shells out,
/// enforces a timeout and an output cap, and hands the raw envelope text
/// back. The predicate-type argument always comes from the
/// [`PredicateKind`] allow-list, never from user input.
pub struct CosignClient {
    binary: String,
    timeout: Duration,
}

impl CosignClient {
    const DEFAULT_BINARY: &'static str = "cosign";
    const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
    /// Attestation payloads for large images run to megabytes; cap the
    /// output to keep a misbehaving tool from exhausting memory.
    const MAX_OUTPUT_BYTES: usize = 10 * 1024 * 1024;

    pub fn new() -> Self {
        Self {
            binary: Self::DEFAULT_BINARY.to_string(),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECONDS),
        }
    }

    /// Overrides the binary name or path (e.g. from the config file).
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = Duration::from_secs(seconds);
        self
    }

    /// Runs the tool with the given arguments.
    ///
    /// A call that outlives the timeout is killed and treated as that
    /// predicate being absent by the caller, rather than blocking the whole
    /// request.
    async fn run(&self, args: &[&str]) -> Result<String> {
        let mut command = Command::new(&self.binary);
        command.args(args).kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| AttestError::AttestationToolError {
                tool: self.binary.clone(),
                details: format!("command timed out after {}s", self.timeout.as_secs()),
            })?
            .map_err(|e| AttestError::AttestationToolError {
                tool: self.binary.clone(),
                details: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AttestError::AttestationToolError {
                tool: self.binary.clone(),
                details: if stderr.trim().is_empty() {
                    format!("exited with {}", output.status)
                } else {
                    stderr.trim().to_string()
                },
            }
            .into());
        }

        if output.stdout.len() > Self::MAX_OUTPUT_BYTES {
            return Err(AttestError::AttestationToolError {
                tool: self.binary.clone(),
                details: format!(
                    "output exceeded {} byte cap",
                    Self::MAX_OUTPUT_BYTES
                ),
            }
            .into());
        }

        String::from_utf8(output.stdout).map_err(|e| {
            AttestError::AttestationToolError {
                tool: self.binary.clone(),
                details: format!("output is not valid UTF-8: {}", e),
            }
            .into()
        })
    }
}

impl Default for CosignClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AttestationProvider for CosignClient {
    async fn fetch_predicate(
        &self,
        image: &ImageReference,
        platform: Platform,
        kind: PredicateKind,
    ) -> Result<String> {
        self.run(&[
            "download",
            "attestation",
            "--platform",
            platform.as_str(),
            "--predicate-type",
            kind.type_uri(),
            image.as_str(),
        ])
        .await
    }
}

#[async_trait]
impl AttestationVerifier for CosignClient {
    async fn verify_attestation(
        &self,
        image: &ImageReference,
        options: &VerifyOptions,
    ) -> Result<VerificationOutcome> {
        let output = self
            .run(&[
                "verify-attestation",
                "--type",
                options.predicate_kind.type_uri(),
                "--certificate-oidc-issuer",
                &options.certificate_oidc_issuer,
                "--certificate-identity",
                &options.certificate_identity,
                image.as_str(),
            ])
            .await?;

        Ok(VerificationOutcome {
            success: true,
            output,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image() -> ImageReference {
        ImageReference::new("cgr.dev/chainguard/nginx:latest".to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_passes_allow_listed_arguments() {
        // `echo` stands in for cosign and prints its arguments back.
        let client = CosignClient::new().with_binary("echo");
        let output = client
            .fetch_predicate(&image(), Platform::LinuxArm64, PredicateKind::Sbom)
            .await
            .unwrap();

        assert!(output.contains("download attestation"));
        assert!(output.contains("--platform linux/arm64"));
        assert!(output.contains("--predicate-type https://spdx.dev/Document"));
        assert!(output.contains("cgr.dev/chainguard/nginx:latest"));
    }

    #[tokio::test]
    async fn test_missing_binary_is_a_tool_error() {
        let client = CosignClient::new().with_binary("attest-graph-no-such-binary");
        let result = client
            .fetch_predicate(&image(), Platform::LinuxAmd64, PredicateKind::Provenance)
            .await;

        assert!(result.is_err());
        let display = format!("{}", result.unwrap_err());
        assert!(display.contains("Attestation tool failed"));
    }

    #[tokio::test]
    async fn test_slow_tool_is_killed_on_timeout() {
        let client = CosignClient::new().with_binary("sleep").with_timeout(1);
        // Arguments become `sleep download attestation ...`, which errors
        // immediately on most systems; use run() directly for a clean case.
        let result = client.run(&["5"]).await;

        assert!(result.is_err());
        let display = format!("{}", result.unwrap_err());
        assert!(display.contains("timed out"));
    }

    #[tokio::test]
    async fn test_nonzero_exit_surfaces_stderr() {
        let client = CosignClient::new().with_binary("false");
        let result = client.run(&[]).await;

        assert!(result.is_err());
        let display = format!("{}", result.unwrap_err());
        assert!(display.contains("exited with"));
    }

    #[tokio::test]
    async fn test_verify_success_wraps_output() {
        let client = CosignClient::new().with_binary("echo");
        let options = VerifyOptions {
            predicate_kind: PredicateKind::Sbom,
            certificate_identity: "https://github.com/example/release.yaml@refs/heads/main"
                .to_string(),
            certificate_oidc_issuer: "https://token.actions.githubusercontent.com".to_string(),
        };

        let outcome = client.verify_attestation(&image(), &options).await.unwrap();
        assert!(outcome.success);
        assert!(outcome.output.contains("verify-attestation"));
    }
}
