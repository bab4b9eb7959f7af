/// Mock implementations for testing
mod mock_attestation_provider;
mod mock_progress_reporter;
mod mock_vulnerability_provider;

pub use mock_attestation_provider::{envelope_text, statement, MockAttestationProvider};
pub use mock_progress_reporter::MockProgressReporter;
pub use mock_vulnerability_provider::MockVulnerabilityProvider;
