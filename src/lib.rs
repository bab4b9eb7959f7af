//! attest-graph - Supply-chain attestation graph and trust assessment
//!
//! This library fetches signed supply-chain attestations (SLSA provenance,
//! SPDX SBOM, build configuration) for a container image, converts them into
//! a typed graph of components and relationships, and computes a trust/risk
//! assessment over that graph. It follows hexagonal architecture: the graph
//! and scoring logic are pure, and all infrastructure sits behind ports.
//!
//! # Architecture
//!
//! - **Domain Layer** (`attestation_graph`): graph model, decoding, scoring
//! - **Application Layer** (`application`): use cases and DTOs
//! - **Ports** (`ports`): interface definitions for infrastructure
//! - **Adapters** (`adapters`): cosign subprocess, OSV client, formatters
//! - **Shared** (`shared`): common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use attest_graph::prelude::*;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<()> {
//! // Create adapters
//! let attestation_provider = CosignClient::new();
//! let vulnerability_provider = OsvClient::new()?;
//! let progress_reporter = StderrProgressReporter::new();
//!
//! // Create use case
//! let use_case = BuildGraphUseCase::new(
//!     attestation_provider,
//!     Some(vulnerability_provider),
//!     progress_reporter,
//! );
//!
//! // Execute
//! let request = AssessmentRequest::new(
//!     "cgr.dev/chainguard/nginx:latest".to_string(),
//!     "linux/amd64".to_string(),
//!     false,
//! );
//! let response = use_case.assess_image(request).await?;
//!
//! // Format output
//! let formatter = JsonFormatter::new();
//! let output = formatter.format(&response.graph, &response.assessment, &response.metadata)?;
//! println!("{}", output);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod attestation_graph;
pub mod cli;
pub mod config;
pub mod ports;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::command::CosignClient;
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{FileSystemWriter, StdoutPresenter};
    pub use crate::adapters::outbound::formatters::{JsonFormatter, MarkdownFormatter};
    pub use crate::adapters::outbound::network::OsvClient;
    pub use crate::application::dto::{GraphRequest, GraphResponse, OutputFormat};
    pub use crate::application::use_cases::{BuildGraphUseCase, VerifyAttestationUseCase};
    pub use crate::attestation_graph::domain::{
        AttestationGraph, Edge, ImageReference, IssueKind, Node, NodeType, Platform,
        PredicateKind, PredicateOutcome, PredicateSet, ReportMetadata, RiskLevel,
        SecurityAssessment, SecurityIssue, Severity, TrustLevel, VulnerabilitySummary,
    };
    pub use crate::attestation_graph::services::{
        EnvelopeDecoder, GraphBuilder, GraphRiskAggregator, NodeRiskEvaluator,
    };
    pub use crate::ports::inbound::{AssessmentRequest, GraphAssessmentPort};
    pub use crate::ports::outbound::{
        AttestationProvider, AttestationVerifier, OutputPresenter, ProgressReporter,
        ReportFormatter, VerificationOutcome, VerifyOptions, VulnerabilityProvider,
    };
    pub use crate::shared::Result;
}
