use serde::Serialize;

/// Classification of a component in the supply-chain graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    Image,
    Provenance,
    SbomDocument,
    BuildConfig,
    SourceCommit,
    ExternalReference,
    GenericAttestation,
}

impl NodeType {
    /// Short human-readable label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            NodeType::Image => "Container Image",
            NodeType::Provenance => "SLSA Provenance",
            NodeType::SbomDocument => "SBOM Document",
            NodeType::BuildConfig => "Build Configuration",
            NodeType::SourceCommit => "Source Commit",
            NodeType::ExternalReference => "External Reference",
            NodeType::GenericAttestation => "Attestation",
        }
    }
}

/// A component in the supply-chain graph.
///
/// The `id` is unique within a graph and stable across runs for the same
/// logical entity, except material nodes, whose ids are positional
/// (`mat-<index>`) and therefore not stable across re-fetches that reorder
/// the materials list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
    /// Raw predicate fragment this node was derived from. Opaque to the
    /// graph itself; consumed by the risk evaluator.
    #[serde(rename = "meta", skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl Node {
    pub fn new(id: impl Into<String>, node_type: NodeType, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_type,
            name: name.into(),
            uri: None,
            digest: None,
            metadata: None,
        }
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn with_digest(mut self, digest: impl Into<String>) -> Self {
        self.digest = Some(digest.into());
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}
