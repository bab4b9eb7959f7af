/// Command adapters - Subprocess implementations of the attestation ports
mod cosign_client;

pub use cosign_client::CosignClient;
