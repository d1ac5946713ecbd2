//! Diagram boundary types and the id-indexed argument graph.
//!
//! The editor hands the engine a flat node list and a directed edge list.
//! `DiagramGraph::build` turns that snapshot into an arena of nodes with an
//! id index and precomputed child adjacency, so the propagators never rescan
//! the flat arrays. Construction is total: unknown edge endpoints are
//! dropped, and an empty snapshot yields an empty, queryable graph.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// Kind of a diagram node. Only goals and strategies participate in
/// propagation; everything else (context, evidence, annotations added by
/// newer editor versions) degrades to `Other` at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// A claim that requires support.
    Goal,
    /// A decomposition linking a goal to the sub-goals that support it.
    Strategy,
    /// Any node kind the engine does not propagate through.
    #[serde(other)]
    Other,
}

/// Node in the argument diagram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramNode {
    pub id: String,
    pub kind: NodeKind,
}

/// Directed edge. Children of a node are the targets of its outgoing edges;
/// a node no edge targets is a root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramEdge {
    pub source_id: String,
    pub target_id: String,
}

/// Id-indexed argument graph for one aggregation run.
#[derive(Debug, Clone)]
pub struct DiagramGraph {
    nodes: Vec<DiagramNode>,
    index: HashMap<String, usize>,
    children: Vec<Vec<usize>>,
    incoming: Vec<usize>,
}

impl DiagramGraph {
    /// Build the node arena and adjacency from a raw snapshot.
    ///
    /// Later nodes with an already-seen id are dropped, as are edges whose
    /// endpoints match no node and repeats of an identical edge.
    pub fn build(nodes: &[DiagramNode], edges: &[DiagramEdge]) -> Self {
        let mut arena: Vec<DiagramNode> = Vec::with_capacity(nodes.len());
        let mut index: HashMap<String, usize> = HashMap::with_capacity(nodes.len());
        for node in nodes {
            if index.contains_key(&node.id) {
                continue;
            }
            index.insert(node.id.clone(), arena.len());
            arena.push(node.clone());
        }

        let mut children: Vec<Vec<usize>> = vec![Vec::new(); arena.len()];
        let mut incoming: Vec<usize> = vec![0; arena.len()];
        let mut seen: HashSet<(usize, usize)> = HashSet::with_capacity(edges.len());
        for edge in edges {
            let (Some(&src), Some(&dst)) = (index.get(&edge.source_id), index.get(&edge.target_id))
            else {
                continue;
            };
            if !seen.insert((src, dst)) {
                continue;
            }
            children[src].push(dst);
            incoming[dst] += 1;
        }

        Self {
            nodes: arena,
            index,
            children,
            incoming,
        }
    }

    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&DiagramNode> {
        self.index.get(id).map(|&slot| &self.nodes[slot])
    }

    /// All nodes, in snapshot order.
    pub fn nodes(&self) -> &[DiagramNode] {
        &self.nodes
    }

    /// Children of a node, in edge order. Unknown ids have no children.
    pub fn children_of(&self, id: &str) -> impl Iterator<Item = &DiagramNode> + '_ {
        self.child_slots(id).iter().map(|&slot| &self.nodes[slot])
    }

    /// Children of a node restricted to one kind.
    pub fn children_of_kind(
        &self,
        id: &str,
        kind: NodeKind,
    ) -> impl Iterator<Item = &DiagramNode> + '_ {
        self.children_of(id).filter(move |n| n.kind == kind)
    }

    /// Whether any edge targets this node. Unknown ids have no incoming edges.
    pub fn has_incoming(&self, id: &str) -> bool {
        match self.index.get(id) {
            Some(&slot) => self.incoming[slot] > 0,
            None => false,
        }
    }

    /// Goal nodes with no incoming edges, in snapshot order. These are the
    /// tops of the argument trees within one diagram.
    pub fn root_goals(&self) -> impl Iterator<Item = &DiagramNode> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(slot, n)| n.kind == NodeKind::Goal && self.incoming[*slot] == 0)
            .map(|(_, n)| n)
    }

    fn child_slots(&self, id: &str) -> &[usize] {
        match self.index.get(id) {
            Some(&slot) => &self.children[slot],
            None => &[],
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, kind: NodeKind) -> DiagramNode {
        DiagramNode {
            id: id.to_string(),
            kind,
        }
    }

    fn edge(source: &str, target: &str) -> DiagramEdge {
        DiagramEdge {
            source_id: source.to_string(),
            target_id: target.to_string(),
        }
    }

    #[test]
    fn empty_snapshot_is_queryable() {
        let graph = DiagramGraph::build(&[], &[]);
        assert!(graph.node("g1").is_none());
        assert_eq!(graph.children_of("g1").count(), 0);
        assert!(!graph.has_incoming("g1"));
        assert_eq!(graph.root_goals().count(), 0);
    }

    #[test]
    fn adjacency_and_roots() {
        let nodes = vec![
            node("g1", NodeKind::Goal),
            node("s1", NodeKind::Strategy),
            node("g2", NodeKind::Goal),
            node("c1", NodeKind::Other),
        ];
        let edges = vec![edge("g1", "s1"), edge("s1", "g2"), edge("g1", "c1")];
        let graph = DiagramGraph::build(&nodes, &edges);

        let child_ids: Vec<&str> = graph.children_of("g1").map(|n| n.id.as_str()).collect();
        assert_eq!(child_ids, vec!["s1", "c1"]);
        let strategies: Vec<&str> = graph
            .children_of_kind("g1", NodeKind::Strategy)
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(strategies, vec!["s1"]);

        assert!(graph.has_incoming("s1"));
        assert!(graph.has_incoming("g2"));
        assert!(!graph.has_incoming("g1"));

        let roots: Vec<&str> = graph.root_goals().map(|n| n.id.as_str()).collect();
        assert_eq!(roots, vec!["g1"]);
    }

    #[test]
    fn unknown_endpoints_and_duplicate_edges_are_dropped() {
        let nodes = vec![node("g1", NodeKind::Goal), node("s1", NodeKind::Strategy)];
        let edges = vec![
            edge("g1", "s1"),
            edge("g1", "s1"),
            edge("g1", "ghost"),
            edge("ghost", "s1"),
        ];
        let graph = DiagramGraph::build(&nodes, &edges);
        assert_eq!(graph.children_of("g1").count(), 1);
        assert!(graph.has_incoming("s1"));
    }

    #[test]
    fn duplicate_node_ids_keep_first() {
        let nodes = vec![node("g1", NodeKind::Goal), node("g1", NodeKind::Strategy)];
        let graph = DiagramGraph::build(&nodes, &[]);
        assert_eq!(graph.nodes().len(), 1);
        assert_eq!(graph.node("g1").unwrap().kind, NodeKind::Goal);
    }

    #[test]
    fn unrecognized_kind_deserializes_to_other() {
        let parsed: DiagramNode =
            serde_json::from_str(r#"{"id":"c9","kind":"context"}"#).unwrap();
        assert_eq!(parsed.kind, NodeKind::Other);
    }
}
