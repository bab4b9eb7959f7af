use serde::Serialize;
use serde_json::Value;

/// The three attestation predicate kinds this tool understands.
///
/// The associated type URIs form a strict allow-list: any other predicate
/// type is rejected before the external attestation tool is invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredicateKind {
    /// SLSA build provenance
    Provenance,
    /// SPDX software bill of materials
    Sbom,
    /// Declarative image build configuration (apko)
    BuildConfig,
}

impl PredicateKind {
    pub const ALL: [PredicateKind; 3] = [
        PredicateKind::Provenance,
        PredicateKind::Sbom,
        PredicateKind::BuildConfig,
    ];

    /// The in-toto predicate type URI passed to the attestation tool.
    pub fn type_uri(&self) -> &'static str {
        match self {
            PredicateKind::Provenance => "https://slsa.dev/provenance/v1",
            PredicateKind::Sbom => "https://spdx.dev/Document",
            PredicateKind::BuildConfig => "https://apko.dev/image-configuration",
        }
    }

    /// Resolves a type URI against the allow-list.
    pub fn from_type_uri(uri: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.type_uri() == uri)
    }

    /// Key used for this source kind in the serialized `raw` map.
    pub fn raw_key(&self) -> &'static str {
        match self {
            PredicateKind::Provenance => "slsa",
            PredicateKind::Sbom => "sbom",
            PredicateKind::BuildConfig => "apko",
        }
    }
}

impl std::fmt::Display for PredicateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PredicateKind::Provenance => "SLSA provenance",
            PredicateKind::Sbom => "SPDX SBOM",
            PredicateKind::BuildConfig => "build configuration",
        };
        write!(f, "{}", name)
    }
}

/// Outcome of a single predicate fetch.
///
/// Each of the three sources is fetched independently and may fail without
/// affecting the others, so absence is an explicit state rather than an
/// error or a bare `None`.
#[derive(Debug, Clone, PartialEq)]
pub enum PredicateOutcome {
    /// A decoded in-toto statement (subject + predicate) was retrieved.
    Retrieved(Value),
    /// The fetch failed, timed out, or decoded to nothing usable.
    Absent,
}

impl PredicateOutcome {
    pub fn as_statement(&self) -> Option<&Value> {
        match self {
            PredicateOutcome::Retrieved(value) => Some(value),
            PredicateOutcome::Absent => None,
        }
    }

    /// The `predicate` field of the decoded statement, when present.
    pub fn predicate(&self) -> Option<&Value> {
        self.as_statement().and_then(|statement| {
            let predicate = statement.get("predicate")?;
            (!predicate.is_null()).then_some(predicate)
        })
    }

    pub fn is_retrieved(&self) -> bool {
        matches!(self, PredicateOutcome::Retrieved(_))
    }
}

impl Serialize for PredicateOutcome {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            PredicateOutcome::Retrieved(value) => value.serialize(serializer),
            PredicateOutcome::Absent => serializer.serialize_none(),
        }
    }
}

/// The per-source fetch outcomes a graph is built from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredicateSet {
    #[serde(rename = "slsa")]
    pub provenance: PredicateOutcome,
    pub sbom: PredicateOutcome,
    #[serde(rename = "apko")]
    pub build_config: PredicateOutcome,
}

impl PredicateSet {
    pub fn empty() -> Self {
        Self {
            provenance: PredicateOutcome::Absent,
            sbom: PredicateOutcome::Absent,
            build_config: PredicateOutcome::Absent,
        }
    }

    pub fn get(&self, kind: PredicateKind) -> &PredicateOutcome {
        match kind {
            PredicateKind::Provenance => &self.provenance,
            PredicateKind::Sbom => &self.sbom,
            PredicateKind::BuildConfig => &self.build_config,
        }
    }

    pub fn set(&mut self, kind: PredicateKind, outcome: PredicateOutcome) {
        match kind {
            PredicateKind::Provenance => self.provenance = outcome,
            PredicateKind::Sbom => self.sbom = outcome,
            PredicateKind::BuildConfig => self.build_config = outcome,
        }
    }

    /// Number of sources that produced a usable predicate.
    pub fn retrieved_count(&self) -> usize {
        PredicateKind::ALL
            .iter()
            .filter(|kind| self.get(**kind).is_retrieved())
            .count()
    }
}
