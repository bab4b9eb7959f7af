/// Use cases module containing application business logic orchestration
mod build_graph;
mod verify_attestation;

pub use build_graph::BuildGraphUseCase;
pub use verify_attestation::VerifyAttestationUseCase;
