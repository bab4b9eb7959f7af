use crate::shared::Result;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::Value;

/// EnvelopeDecoder service for turning raw signed envelopes into predicates
///
/// Attestation payloads are double-encoded: a newline-delimited stream of
/// JSON envelopes, each wrapping a base64 `payload` that itself contains the
/// JSON in-toto statement. The outer format is signing-envelope-agnostic, so
/// decoding makes no assumption about the signing scheme.
pub struct EnvelopeDecoder;

impl EnvelopeDecoder {
    /// Decodes raw envelope text into an ordered sequence of statements.
    ///
    /// Empty or whitespace-only input yields an empty sequence. Any
    /// malformed line fails the WHOLE input: the failure is logged and an
    /// empty sequence is returned. Callers must treat an empty sequence as
    /// "no usable attestation", never as a hard failure of the request.
    pub fn decode(raw: &str) -> Vec<Value> {
        match Self::try_decode(raw) {
            Ok(statements) => statements,
            Err(e) => {
                eprintln!("⚠️  Warning: Failed to decode attestations: {}", e);
                Vec::new()
            }
        }
    }

    /// Fallible decoding of the full envelope stream.
    ///
    /// Each non-empty line is parsed independently; the first malformed
    /// line aborts the input (fail fast, not per-line skip).
    pub fn try_decode(raw: &str) -> Result<Vec<Value>> {
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        raw.lines()
            .filter(|line| !line.trim().is_empty())
            .map(Self::decode_line)
            .collect()
    }

    fn decode_line(line: &str) -> Result<Value> {
        let envelope: Value = serde_json::from_str(line)
            .map_err(|e| anyhow::anyhow!("envelope is not valid JSON: {}", e))?;

        let payload = envelope
            .get("payload")
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow::anyhow!("missing payload in attestation"))?;

        let decoded = BASE64
            .decode(payload)
            .map_err(|e| anyhow::anyhow!("payload is not valid base64: {}", e))?;

        let text = String::from_utf8(decoded)
            .map_err(|e| anyhow::anyhow!("payload is not valid UTF-8: {}", e))?;

        serde_json::from_str(&text)
            .map_err(|e| anyhow::anyhow!("decoded payload is not valid JSON: {}", e))
    }
}
