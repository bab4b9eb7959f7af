use crate::application::dto::{GraphRequest, GraphResponse};
use crate::attestation_graph::domain::{
    AttestationGraph, ImageReference, NodeType, PredicateKind, PredicateOutcome, PredicateSet,
    ReportMetadata, VulnerabilitySummary,
};
use crate::attestation_graph::services::{EnvelopeDecoder, GraphBuilder, GraphRiskAggregator};
use crate::ports::inbound::{AssessmentRequest, GraphAssessmentPort};
use crate::ports::outbound::{AttestationProvider, ProgressReporter, VulnerabilityProvider};
use crate::shared::Result;
use async_trait::async_trait;

/// BuildGraphUseCase - Core use case for graph construction and assessment
///
/// Orchestrates the full flow: fetch the three predicate kinds concurrently,
/// decode them, build the graph, optionally enrich with the vulnerability
/// provider, and aggregate the risk verdict. All infrastructure arrives via
/// generic dependency injection.
///
/// Partial attestation loss is not an error: each fetch may fail
/// independently and the graph degrades instead. Only invalid input and a
/// graph with no rootable digest fail the request.
///
/// # Type Parameters
/// * `AP` - AttestationProvider implementation
/// * `VP` - VulnerabilityProvider implementation (optional)
/// * `PR` - ProgressReporter implementation
pub struct BuildGraphUseCase<AP, VP, PR> {
    attestation_provider: AP,
    vulnerability_provider: Option<VP>,
    progress_reporter: PR,
}

impl<AP, VP, PR> BuildGraphUseCase<AP, VP, PR>
where
    AP: AttestationProvider,
    VP: VulnerabilityProvider,
    PR: ProgressReporter,
{
    /// Creates a new BuildGraphUseCase with injected dependencies
    pub fn new(
        attestation_provider: AP,
        vulnerability_provider: Option<VP>,
        progress_reporter: PR,
    ) -> Self {
        Self {
            attestation_provider,
            vulnerability_provider,
            progress_reporter,
        }
    }

    /// Executes the graph/assessment use case
    ///
    /// # Arguments
    /// * `request` - Validated request with image, platform and options
    ///
    /// # Returns
    /// GraphResponse containing the graph, its assessment and run metadata
    pub async fn execute(&self, request: GraphRequest) -> Result<GraphResponse> {
        self.progress_reporter.report(&format!(
            "🔍 Fetching attestations for {} ({})",
            request.image, request.platform
        ));

        let predicates = self.fetch_predicates(&request).await;
        self.progress_reporter.report(&format!(
            "✅ Retrieved {} of {} attestation kind(s)",
            predicates.retrieved_count(),
            PredicateKind::ALL.len()
        ));

        let metadata =
            ReportMetadata::generate(request.image.clone(), request.platform, &predicates);
        let graph = GraphBuilder::build(&request.image, request.platform, predicates)?;
        self.progress_reporter.report(&format!(
            "🧩 Graph built: {} node(s), {} edge(s)",
            graph.nodes.len(),
            graph.edges.len()
        ));

        let vulnerabilities = self.fetch_vulnerability_summary(&graph, &request).await;

        let assessment = GraphRiskAggregator::assess(&graph, vulnerabilities);
        self.progress_reporter.report_completion(&format!(
            "🛡️  Assessment complete: {} / {} (score {}/100)",
            assessment.trust_level.label(),
            assessment.risk_level.label(),
            assessment.score
        ));

        Ok(GraphResponse::new(graph, assessment, metadata))
    }

    /// Fetches the three predicate kinds concurrently. Each fetch fails
    /// independently; a failure or unusable payload becomes an Absent
    /// outcome for that source only.
    async fn fetch_predicates(&self, request: &GraphRequest) -> PredicateSet {
        let (provenance, sbom, build_config) = futures::join!(
            self.fetch_one(request, PredicateKind::Provenance),
            self.fetch_one(request, PredicateKind::Sbom),
            self.fetch_one(request, PredicateKind::BuildConfig),
        );

        PredicateSet {
            provenance,
            sbom,
            build_config,
        }
    }

    async fn fetch_one(&self, request: &GraphRequest, kind: PredicateKind) -> PredicateOutcome {
        let raw = match self
            .attestation_provider
            .fetch_predicate(&request.image, request.platform, kind)
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                self.progress_reporter
                    .report_error(&format!("⚠️  Could not fetch {}: {}", kind, e));
                return PredicateOutcome::Absent;
            }
        };

        // Multiple envelopes per kind are possible; the first statement is
        // the one the graph is built from.
        let mut statements = EnvelopeDecoder::decode(&raw);
        if statements.is_empty() {
            self.progress_reporter
                .report_error(&format!("⚠️  No usable {} attestation", kind));
            return PredicateOutcome::Absent;
        }

        PredicateOutcome::Retrieved(statements.remove(0))
    }

    /// Vulnerability lookup is attempted only when requested, a provider is
    /// wired, and the graph actually has an SBOM to read packages from.
    /// Provider failure is logged and the assessment proceeds without it.
    async fn fetch_vulnerability_summary(
        &self,
        graph: &AttestationGraph,
        request: &GraphRequest,
    ) -> Option<VulnerabilitySummary> {
        if !request.check_vulnerabilities || !graph.has_node_type(NodeType::SbomDocument) {
            return None;
        }

        let provider = self.vulnerability_provider.as_ref()?;
        self.progress_reporter
            .report("🔬 Querying vulnerability database...");

        match provider.assess(graph).await {
            Ok(summary) => {
                self.progress_reporter.report(&format!(
                    "📋 {} vulnerability/ies found",
                    summary.total_vulnerabilities
                ));
                Some(summary)
            }
            Err(e) => {
                self.progress_reporter
                    .report_error(&format!("⚠️  Vulnerability lookup failed: {}", e));
                None
            }
        }
    }
}

#[async_trait]
impl<AP, VP, PR> GraphAssessmentPort for BuildGraphUseCase<AP, VP, PR>
where
    AP: AttestationProvider,
    VP: VulnerabilityProvider,
    PR: ProgressReporter,
{
    async fn assess_image(&self, request: AssessmentRequest) -> Result<GraphResponse> {
        // Validation happens here, before any external call.
        let image = ImageReference::new(request.image)?;
        let platform = request.platform.parse()?;

        self.execute(GraphRequest::new(
            image,
            platform,
            request.check_vulnerabilities,
        ))
        .await
    }
}
