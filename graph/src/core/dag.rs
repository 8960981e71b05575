use std::collections::HashMap;

use super::{edge::AnchorEdge, node::AnchorNode};

/// Anchor dependency graph: commit nodes plus forward (commit -> anchors)
/// and reverse (anchor -> dependents) adjacency.
#[derive(Debug, Default)]
pub struct AnchorDag {
    /// All nodes indexed by commit id
    pub nodes: HashMap<String, AnchorNode>,
    /// All edges, in insertion order
    pub edges: Vec<AnchorEdge>,
    /// commit id -> anchors it depends on
    pub anchors: HashMap<String, Vec<String>>,
    /// anchor id -> commits anchored on it
    pub dependents: HashMap<String, Vec<String>>,
}

impl AnchorDag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node; an existing node under the same id is kept as-is.
    pub fn add_node(&mut self, node: AnchorNode) {
        self.nodes.entry(node.id.clone()).or_insert(node);
    }

    /// Record `from -> to`. Duplicate pairs for the same source commit
    /// are dropped.
    pub fn add_anchor(&mut self, from: &str, to: &str) {
        let list = self.anchors.entry(from.to_string()).or_default();
        if list.iter().any(|anchor| anchor == to) {
            return;
        }
        list.push(to.to_string());
        self.dependents
            .entry(to.to_string())
            .or_default()
            .push(from.to_string());
        self.edges
            .push(AnchorEdge::new(from.to_string(), to.to_string()));
    }

    /// A commit that anchors on nothing and that nothing anchors on.
    pub fn is_solo(&self, id: &str) -> bool {
        self.anchors.get(id).map_or(true, |list| list.is_empty())
            && self.dependents.get(id).map_or(true, |list| list.is_empty())
    }

    pub fn get(&self, id: &str) -> Option<&AnchorNode> {
        self.nodes.get(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
