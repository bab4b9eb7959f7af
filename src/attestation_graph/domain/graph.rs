use super::edge::Edge;
use super::node::{Node, NodeType};
use super::predicate::PredicateSet;
use serde::Serialize;

/// The supply-chain graph for one image.
///
/// Constructed fresh per request from decoded predicates and immutable once
/// returned; consumers (formatters, the risk engine) only read it. Node
/// order is insertion order (root, provenance, materials, sbom, config),
/// which the risk aggregator relies on for reproducible scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttestationGraph {
    pub root: String,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub raw: PredicateSet,
}

impl AttestationGraph {
    pub fn new(root: String, nodes: Vec<Node>, edges: Vec<Edge>, raw: PredicateSet) -> Self {
        Self {
            root,
            nodes,
            edges,
            raw,
        }
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn root_node(&self) -> Option<&Node> {
        self.node(&self.root)
    }

    pub fn has_node_type(&self, node_type: NodeType) -> bool {
        self.nodes.iter().any(|node| node.node_type == node_type)
    }

    pub fn nodes_of_type(&self, node_type: NodeType) -> impl Iterator<Item = &Node> {
        self.nodes
            .iter()
            .filter(move |node| node.node_type == node_type)
    }

    /// Edges leaving the given node.
    pub fn outgoing_edges<'a>(&'a self, from: &'a str) -> impl Iterator<Item = &'a Edge> {
        self.edges.iter().filter(move |edge| edge.from == from)
    }

    /// Checks the no-dangling-edges invariant: every edge endpoint resolves
    /// to a node in this graph.
    pub fn is_well_formed(&self) -> bool {
        self.edges
            .iter()
            .all(|edge| self.node(&edge.from).is_some() && self.node(&edge.to).is_some())
    }
}
