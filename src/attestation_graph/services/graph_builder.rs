use crate::attestation_graph::domain::{
    AttestationGraph, Edge, ImageReference, Node, NodeType, Platform, PredicateOutcome,
    PredicateSet,
};
use crate::shared::error::AttestError;
use crate::shared::Result;
use serde_json::Value;

/// GraphBuilder service for assembling the supply-chain graph
///
/// Consumes the per-source predicate outcomes and produces the typed graph.
/// Any subset of sources may be absent; only the total absence of a subject
/// digest is fatal. Material node ids are positional (`mat-<index>`) and are
/// not stable across re-fetches that reorder the materials list; repeated
/// materials produce repeated nodes on purpose.
pub struct GraphBuilder;

impl GraphBuilder {
    /// Builds the graph for one image from its decoded predicates.
    ///
    /// # Errors
    /// Returns `AttestError::NoAttestationFound` when neither the provenance
    /// nor the SBOM statement declares a subject digest; without a digest
    /// no graph can be rooted.
    pub fn build(
        image: &ImageReference,
        platform: Platform,
        predicates: PredicateSet,
    ) -> Result<AttestationGraph> {
        // Prefer the provenance subject digest, fall back to the SBOM's.
        let digest = Self::subject_digest(&predicates.provenance)
            .or_else(|| Self::subject_digest(&predicates.sbom))
            .ok_or_else(|| AttestError::NoAttestationFound {
                image: image.to_string(),
                platform: platform.to_string(),
            })?;

        let root_id = format!("sha256:{}", digest);
        let mut nodes = Vec::new();
        let mut edges = Vec::new();

        // The root is named by the original reference, not the digest, for
        // readability; the digest lives in `id` and `digest`.
        nodes.push(
            Node::new(root_id.clone(), NodeType::Image, image.as_str())
                .with_digest(root_id.clone()),
        );

        if let Some(predicate) = predicates.provenance.predicate() {
            Self::add_provenance_nodes(&root_id, predicate, &mut nodes, &mut edges);
        }

        if let Some(predicate) = predicates.sbom.predicate() {
            nodes.push(
                Node::new("att-sbom", NodeType::SbomDocument, "SBOM (SPDX)")
                    .with_metadata(predicate.clone()),
            );
            edges.push(Edge::new("e-root-sbom", root_id.clone(), "att-sbom", "describes"));
        }

        if let Some(predicate) = predicates.build_config.predicate() {
            nodes.push(
                Node::new("att-apko", NodeType::BuildConfig, "APKO Configuration")
                    .with_metadata(predicate.clone()),
            );
            edges.push(Edge::new(
                "e-root-apko",
                root_id.clone(),
                "att-apko",
                "configured by",
            ));
        }

        Ok(AttestationGraph::new(root_id, nodes, edges, predicates))
    }

    fn add_provenance_nodes(
        root_id: &str,
        predicate: &Value,
        nodes: &mut Vec<Node>,
        edges: &mut Vec<Edge>,
    ) {
        nodes.push(
            Node::new("att-slsa", NodeType::Provenance, "SLSA v1 Provenance")
                .with_metadata(predicate.clone()),
        );
        edges.push(Edge::new(
            "e-root-slsa",
            root_id.to_string(),
            "att-slsa",
            "attests",
        ));

        // One node per material at its list index. Duplicates are kept:
        // collapsing them would change ids and hide repeated inputs.
        let materials = predicate
            .get("materials")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        for (index, material) in materials.iter().enumerate() {
            let uri = material.get("uri").and_then(Value::as_str);
            let name = uri
                .map(str::to_string)
                .unwrap_or_else(|| format!("Material {}", index + 1));
            let node_type = match uri {
                Some(uri) if Self::is_source_repository(uri) => NodeType::SourceCommit,
                _ => NodeType::ExternalReference,
            };

            let mut node =
                Node::new(format!("mat-{}", index), node_type, name).with_metadata(material.clone());
            if let Some(uri) = uri {
                node = node.with_uri(uri);
            }
            nodes.push(node);

            edges.push(Edge::new(
                format!("e-slsa-{}", index),
                "att-slsa",
                format!("mat-{}", index),
                "built from",
            ));
        }
    }

    /// A material counts as source when its URI uses a git scheme or points
    /// at a recognized source-hosting domain.
    fn is_source_repository(uri: &str) -> bool {
        if uri.starts_with("git+") || uri.starts_with("git:") || uri.starts_with("git@") {
            return true;
        }

        let host = uri
            .strip_prefix("https://")
            .or_else(|| uri.strip_prefix("http://"));
        matches!(
            host,
            Some(rest)
                if rest.starts_with("github") || rest.starts_with("gitlab") || rest.starts_with("bitbucket")
        )
    }

    fn subject_digest(outcome: &PredicateOutcome) -> Option<String> {
        outcome
            .as_statement()?
            .get("subject")?
            .get(0)?
            .get("digest")?
            .get("sha256")?
            .as_str()
            .map(str::to_string)
    }
}
