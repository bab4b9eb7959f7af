use serde::Serialize;

/// A directed, labeled relationship between two nodes.
///
/// `from` and `to` must both resolve to nodes present in the same graph;
/// a dangling edge is a construction bug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub id: String,
    pub from: String,
    pub to: String,
    pub label: String,
}

impl Edge {
    pub fn new(
        id: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            from: from.into(),
            to: to.into(),
            label: label.into(),
        }
    }
}
