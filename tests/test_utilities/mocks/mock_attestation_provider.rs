use attest_graph::prelude::*;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::{json, Value};
use std::collections::HashMap;

/// Builds an in-toto statement with a subject digest and a predicate.
pub fn statement(digest: &str, predicate: Value) -> Value {
    json!({
        "_type": "https://in-toto.io/Statement/v1",
        "subject": [{"name": "test-image", "digest": {"sha256": digest}}],
        "predicate": predicate,
    })
}

/// Wraps a statement in the double-encoded envelope format the decoder
/// expects: JSON envelope, base64 payload, JSON statement inside.
pub fn envelope_text(statement: &Value) -> String {
    let payload = BASE64.encode(statement.to_string());
    json!({
        "payloadType": "application/vnd.in-toto+json",
        "payload": payload,
        "signatures": [{"keyid": "", "sig": "mock"}],
    })
    .to_string()
}

/// Mock AttestationProvider for testing
///
/// Canned envelope text per predicate kind; kinds without a canned value
/// fail the fetch, which callers must treat as that predicate being absent.
pub struct MockAttestationProvider {
    responses: HashMap<&'static str, String>,
}

impl MockAttestationProvider {
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
        }
    }

    pub fn with_statement(self, kind: PredicateKind, statement: &Value) -> Self {
        self.with_raw(kind, envelope_text(statement))
    }

    pub fn with_raw(mut self, kind: PredicateKind, raw: String) -> Self {
        self.responses.insert(kind.type_uri(), raw);
        self
    }
}

impl Default for MockAttestationProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AttestationProvider for MockAttestationProvider {
    async fn fetch_predicate(
        &self,
        _image: &ImageReference,
        _platform: Platform,
        kind: PredicateKind,
    ) -> Result<String> {
        match self.responses.get(kind.type_uri()) {
            Some(raw) => Ok(raw.clone()),
            None => anyhow::bail!("mock fetch failure for {}", kind),
        }
    }
}
