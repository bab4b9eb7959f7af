/// Attestation graph bounded context: domain model, services and policies
///
/// Everything in this module is pure: no I/O, no clocks beyond metadata
/// stamping, no network. Infrastructure lives behind the ports.
pub mod domain;
pub mod policies;
pub mod services;
