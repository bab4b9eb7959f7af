use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow CI systems to distinguish between a clean report,
/// an untrusted verdict, and operational failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - graph built and the image is not untrusted
    Success = 0,
    /// Assessment completed but the image came out untrusted
    UntrustedImage = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (attestation tool error, network error, file I/O error, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::UntrustedImage => write!(f, "Untrusted Image (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Application-specific errors for attestation graph construction.
///
/// Uses thiserror to derive Display and Error traits automatically,
/// reducing boilerplate while maintaining user-friendly error messages.
///
/// Only `InvalidImageReference`, `InvalidPlatform` and `NoAttestationFound`
/// surface as user-visible failures; fetch and decode problems degrade the
/// graph instead of failing the request.
#[derive(Debug, Error)]
pub enum AttestError {
    #[error("Invalid image reference: {reference}\nReason: {reason}\n\n💡 Hint: Pass a registry reference such as 'cgr.dev/chainguard/nginx:latest'")]
    InvalidImageReference { reference: String, reason: String },

    #[error("Invalid platform: {platform}\n\n💡 Hint: Supported platforms are linux/amd64, linux/arm64, linux/386, linux/arm/v6, linux/arm/v7, linux/ppc64le and linux/s390x")]
    InvalidPlatform { platform: String },

    #[error("No valid attestations found for {image}\n\n💡 Hint: The image may be unsigned, or its attestations may not be published for platform {platform}")]
    NoAttestationFound { image: String, platform: String },

    #[error("Attestation tool failed: {details}\n\n💡 Hint: Verify that '{tool}' is installed and on your PATH")]
    AttestationToolError { tool: String, details: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    /// Validation error for builder patterns
    #[error("Validation error: {message}")]
    Validation { message: String },
}
