pub mod assessment;
pub mod edge;
pub mod graph;
pub mod image_ref;
pub mod node;
pub mod predicate;
pub mod report_metadata;

pub use assessment::{
    IssueKind, RiskLevel, SecurityAssessment, SecurityIssue, Severity, TrustLevel,
    VulnerabilitySummary,
};
pub use edge::Edge;
pub use graph::AttestationGraph;
pub use image_ref::{ImageReference, Platform};
pub use node::{Node, NodeType};
pub use predicate::{PredicateKind, PredicateOutcome, PredicateSet};
pub use report_metadata::{AttestationCounts, ReportMetadata};
