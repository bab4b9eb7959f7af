use crate::attestation_graph::domain::{
    AttestationGraph, NodeType, Severity, VulnerabilitySummary,
};
use crate::ports::outbound::VulnerabilityProvider;
use crate::shared::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// OSV API client implementing the vulnerability provider port
///
/// Uses the OSV.dev Batch Query API to check the SBOM's package inventory
/// in one round trip, then fetches per-vulnerability details for severity.
/// Identical vulnerability ids across packages are resolved once and
/// memoized.
///
/// # Security
/// - Implements rate limiting between detail requests (10 req/sec)
/// - Implements timeout (30 seconds)
/// - Does not retry failed requests (fail fast; the caller degrades)
pub struct OsvClient {
    client: Client,
    api_url: String,
    severity_cache: DashMap<String, Option<Severity>>,
}

impl OsvClient {
    const API_ENDPOINT: &'static str = "https://api.osv.dev/v1";
    const TIMEOUT_SECONDS: u64 = 30;
    const RATE_LIMIT_MS: u64 = 100; // 10 req/sec
    const MAX_BATCH_SIZE: usize = 100; // OSV API limit

    /// Creates a new OSV API client with default configuration
    pub fn new() -> Result<Self> {
        let version = env!("CARGO_PKG_VERSION");
        let user_agent = format!("attest-graph/{}", version);
        let client = Client::builder()
            .timeout(Duration::from_secs(Self::TIMEOUT_SECONDS))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            api_url: Self::API_ENDPOINT.to_string(),
            severity_cache: DashMap::new(),
        })
    }

    /// Extracts package identities from the graph's SBOM node.
    ///
    /// SPDX packages carry a purl in their external references; packages
    /// without one cannot be queried and are skipped.
    fn collect_purls(graph: &AttestationGraph) -> Vec<String> {
        let Some(sbom) = graph.nodes_of_type(NodeType::SbomDocument).next() else {
            return Vec::new();
        };

        let packages = sbom
            .metadata
            .as_ref()
            .and_then(|metadata| metadata.get("packages"))
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        packages
            .iter()
            .filter_map(|package| {
                package
                    .get("externalRefs")?
                    .as_array()?
                    .iter()
                    .find(|reference| {
                        reference.get("referenceType").and_then(Value::as_str) == Some("purl")
                    })?
                    .get("referenceLocator")?
                    .as_str()
                    .map(str::to_string)
            })
            .collect()
    }

    /// Queries the batch endpoint for all purls, chunked to the API limit.
    async fn query_batch(&self, purls: &[String]) -> Result<Vec<String>> {
        let mut vulnerability_ids: Vec<String> = Vec::new();

        for chunk in purls.chunks(Self::MAX_BATCH_SIZE) {
            if !vulnerability_ids.is_empty() {
                tokio::time::sleep(Duration::from_millis(Self::RATE_LIMIT_MS)).await;
            }

            let queries: Vec<OsvQuery> = chunk
                .iter()
                .map(|purl| OsvQuery {
                    package: OsvPackage { purl: purl.clone() },
                })
                .collect();

            let response = self
                .client
                .post(format!("{}/querybatch", self.api_url))
                .json(&OsvBatchQuery { queries })
                .send()
                .await?;

            if !response.status().is_success() {
                anyhow::bail!("OSV API returned status code {}", response.status());
            }

            let batch: OsvBatchResponse = response.json().await?;
            for result in batch.results {
                for vuln in result.vulns {
                    if !vulnerability_ids.contains(&vuln.id) {
                        vulnerability_ids.push(vuln.id);
                    }
                }
            }
        }

        Ok(vulnerability_ids)
    }

    /// Resolves the severity of one vulnerability, memoized by id.
    ///
    /// The batch API returns minimal information; severity requires the
    /// per-vulnerability endpoint. Fallback order matches what the data
    /// provides: the database-specific severity string first, then the
    /// CVSS v3 vector.
    async fn resolve_severity(&self, vulnerability_id: &str) -> Result<Option<Severity>> {
        if let Some(cached) = self.severity_cache.get(vulnerability_id) {
            return Ok(*cached);
        }

        let url = format!(
            "{}/vulns/{}",
            self.api_url,
            urlencoding::encode(vulnerability_id)
        );
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            anyhow::bail!(
                "OSV API returned status code {} for vulnerability {}",
                response.status(),
                vulnerability_id
            );
        }

        let vuln: OsvVulnerability = response.json().await?;
        let severity = Self::classify(&vuln);
        self.severity_cache
            .insert(vulnerability_id.to_string(), severity);
        Ok(severity)
    }

    fn classify(vuln: &OsvVulnerability) -> Option<Severity> {
        if let Some(label) = vuln
            .database_specific
            .as_ref()
            .and_then(|db| db.severity.as_deref())
        {
            if let Some(severity) = parse_severity_string(label) {
                return Some(severity);
            }
        }

        vuln.severity
            .as_ref()
            .and_then(|severities| {
                severities
                    .iter()
                    .find(|s| s.severity_type == "CVSS_V3")
                    .or_else(|| severities.iter().find(|s| s.severity_type == "CVSS_V4"))
            })
            .and_then(|s| cvss_base_score(&s.score))
            .map(severity_from_score)
    }

    fn summarize(
        counts: (usize, usize, usize, usize),
        total_vulnerabilities: usize,
    ) -> VulnerabilitySummary {
        let (critical_count, high_count, medium_count, low_count) = counts;

        let overall_risk_score = usize::min(
            100,
            critical_count * 25 + high_count * 10 + medium_count * 3 + low_count,
        ) as u8;

        let mut recommended_actions = Vec::new();
        if critical_count > 0 {
            recommended_actions.push(format!(
                "Immediately update the {} dependency/ies with critical vulnerabilities.",
                critical_count
            ));
        }
        if high_count > 0 {
            recommended_actions.push(format!(
                "Prioritize fixes for {} high-severity vulnerability/ies.",
                high_count
            ));
        }
        if total_vulnerabilities > 0 {
            recommended_actions
                .push("Review the full vulnerability list and pin fixed versions.".to_string());
        }

        VulnerabilitySummary {
            critical_count,
            high_count,
            medium_count,
            low_count,
            total_vulnerabilities,
            overall_risk_score,
            recommended_actions,
        }
    }
}

#[async_trait]
impl VulnerabilityProvider for OsvClient {
    async fn assess(&self, graph: &AttestationGraph) -> Result<VulnerabilitySummary> {
        let purls = Self::collect_purls(graph);
        if purls.is_empty() {
            return Ok(Self::summarize((0, 0, 0, 0), 0));
        }

        let vulnerability_ids = self.query_batch(&purls).await?;
        let total = vulnerability_ids.len();

        let mut critical = 0;
        let mut high = 0;
        let mut medium = 0;
        let mut low = 0;

        for (index, id) in vulnerability_ids.iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(Duration::from_millis(Self::RATE_LIMIT_MS)).await;
            }

            match self.resolve_severity(id).await {
                Ok(Some(Severity::Critical)) => critical += 1,
                Ok(Some(Severity::High)) => high += 1,
                Ok(Some(Severity::Medium)) => medium += 1,
                Ok(Some(Severity::Low)) | Ok(None) => low += 1,
                Err(e) => {
                    // Keep counting what we can resolve.
                    eprintln!("⚠️  Warning: Failed to fetch details for {}: {}", id, e);
                    low += 1;
                }
            }
        }

        Ok(Self::summarize((critical, high, medium, low), total))
    }
}

// OSV API request/response structures

#[derive(Debug, Serialize)]
struct OsvBatchQuery {
    queries: Vec<OsvQuery>,
}

#[derive(Debug, Serialize)]
struct OsvQuery {
    package: OsvPackage,
}

#[derive(Debug, Serialize)]
struct OsvPackage {
    purl: String,
}

#[derive(Debug, Deserialize)]
struct OsvBatchResponse {
    results: Vec<OsvResult>,
}

#[derive(Debug, Deserialize)]
struct OsvResult {
    #[serde(default)]
    vulns: Vec<OsvVulnerabilityRef>,
}

#[derive(Debug, Deserialize)]
struct OsvVulnerabilityRef {
    id: String,
}

#[derive(Debug, Deserialize)]
struct OsvVulnerability {
    #[allow(dead_code)]
    id: String,
    #[serde(default)]
    severity: Option<Vec<OsvSeverity>>,
    #[serde(default)]
    database_specific: Option<DatabaseSpecific>,
}

#[derive(Debug, Deserialize)]
struct OsvSeverity {
    #[serde(rename = "type")]
    severity_type: String, // "CVSS_V3"
    score: String, // e.g. "CVSS:3.1/AV:N/AC:L/..."
}

#[derive(Debug, Deserialize)]
struct DatabaseSpecific {
    #[serde(default)]
    severity: Option<String>, // "CRITICAL", "HIGH", "MODERATE", "MEDIUM", "LOW"
}

/// Maps a database-specific severity label onto the domain severity.
fn parse_severity_string(severity: &str) -> Option<Severity> {
    match severity.to_uppercase().as_str() {
        "CRITICAL" => Some(Severity::Critical),
        "HIGH" => Some(Severity::High),
        "MODERATE" | "MEDIUM" => Some(Severity::Medium),
        "LOW" => Some(Severity::Low),
        _ => None,
    }
}

fn severity_from_score(score: f64) -> Severity {
    if score >= 9.0 {
        Severity::Critical
    } else if score >= 7.0 {
        Severity::High
    } else if score >= 4.0 {
        Severity::Medium
    } else {
        Severity::Low
    }
}

/// Computes the CVSS v3 base score from a vector string.
///
/// Example: "CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:H/A:H" -> Some(9.8)
fn cvss_base_score(vector: &str) -> Option<f64> {
    let metrics: std::collections::HashMap<&str, &str> = vector
        .split('/')
        .skip(1) // Skip "CVSS:3.1" or "CVSS:3.0"
        .filter_map(|part| {
            let mut split = part.split(':');
            Some((split.next()?, split.next()?))
        })
        .collect();

    let scope_changed = *metrics.get("S")? == "C";

    let attack_vector = match *metrics.get("AV")? {
        "N" => 0.85,
        "A" => 0.62,
        "L" => 0.55,
        "P" => 0.2,
        _ => return None,
    };
    let attack_complexity = match *metrics.get("AC")? {
        "L" => 0.77,
        "H" => 0.44,
        _ => return None,
    };
    let privileges_required = match (*metrics.get("PR")?, scope_changed) {
        ("N", _) => 0.85,
        ("L", false) => 0.62,
        ("L", true) => 0.68,
        ("H", false) => 0.27,
        ("H", true) => 0.5,
        _ => return None,
    };
    let user_interaction = match *metrics.get("UI")? {
        "N" => 0.85,
        "R" => 0.62,
        _ => return None,
    };

    let impact_of = |metric: &str| -> Option<f64> {
        match *metrics.get(metric)? {
            "N" => Some(0.0),
            "L" => Some(0.22),
            "H" => Some(0.56),
            _ => None,
        }
    };
    let confidentiality = impact_of("C")?;
    let integrity = impact_of("I")?;
    let availability = impact_of("A")?;

    let iss = 1.0 - ((1.0 - confidentiality) * (1.0 - integrity) * (1.0 - availability));
    let impact = if scope_changed {
        7.52 * (iss - 0.029) - 3.25 * (iss - 0.02_f64).powi(15)
    } else {
        6.42 * iss
    };
    let exploitability =
        8.22 * attack_vector * attack_complexity * privileges_required * user_interaction;

    let base_score = if impact <= 0.0 {
        0.0
    } else if scope_changed {
        f64::min(1.08 * (impact + exploitability), 10.0)
    } else {
        f64::min(impact + exploitability, 10.0)
    };

    // Round up to one decimal place, per the CVSS specification.
    Some((base_score * 10.0).ceil() / 10.0)
}
