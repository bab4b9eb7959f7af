/// Inbound ports (Driving ports) - Use case interfaces
///
/// These ports define the interfaces that external adapters (e.g., CLI)
/// use to interact with the application core.
pub mod graph_assessment_port;

pub use graph_assessment_port::{AssessmentRequest, GraphAssessmentPort};
