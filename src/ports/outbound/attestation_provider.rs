use crate::attestation_graph::domain::{ImageReference, Platform, PredicateKind};
use crate::shared::Result;
use async_trait::async_trait;

/// AttestationProvider port for fetching raw attestation envelopes
///
/// This port abstracts the external signing/attestation tool. Given an image
/// reference, platform and predicate kind it returns the raw
/// newline-delimited envelope text, or fails. Signature verification is the
/// tool's responsibility, not ours.
///
/// # Async Support
/// The three predicate kinds are fetched concurrently, so implementations
/// must be `Send + Sync`.
#[async_trait]
pub trait AttestationProvider: Send + Sync {
    /// Fetches the raw envelope text for one predicate kind
    ///
    /// # Arguments
    /// * `image` - Validated image reference
    /// * `platform` - Target platform for the manifest lookup
    /// * `kind` - One of the three allow-listed predicate kinds
    ///
    /// # Returns
    /// Raw newline-delimited envelope text. May be empty when the image
    /// carries no attestation of this kind.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The external tool is missing or exits non-zero
    /// - The call exceeds the configured timeout
    /// - The tool produces more output than the configured cap
    async fn fetch_predicate(
        &self,
        image: &ImageReference,
        platform: Platform,
        kind: PredicateKind,
    ) -> Result<String>;
}
