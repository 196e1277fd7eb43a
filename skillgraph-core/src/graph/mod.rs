//! In-memory directed property graph over the canonical tables.
//!
//! Nodes and edges live in flat arenas referenced by indices, which keeps
//! arbitrary (even cyclic) references trivially safe and makes bounded
//! traversal natural to express.

pub mod builder;
pub mod handle;
pub mod model;
pub mod query;

pub use builder::{EdgePolicy, GraphBuilder};
pub use handle::GraphHandle;
pub use model::{composite_id, Edge, EdgeKind, Node, NodeData, NodeKind};

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

use crate::domain::id_key;

/// Node and edge counts broken down by kind. `BTreeMap` keeps the
/// breakdowns deterministically ordered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub nodes_by_kind: BTreeMap<String, usize>,
    pub edges_by_kind: BTreeMap<String, usize>,
}

/// The competence graph: an arena of typed nodes and directed typed
/// edges, indexed by composite id and by per-node adjacency lists.
#[derive(Debug, Default)]
pub struct SkillGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    index: HashMap<String, usize>,
    outgoing: Vec<Vec<usize>>,
    incoming: Vec<Vec<usize>>,
}

impl SkillGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a graph from persisted parts. The id index and adjacency
    /// lists are derived, not stored. Edges pointing outside the node
    /// arena (a corrupt snapshot) are dropped with a warning instead of
    /// poisoning the instance.
    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        let mut graph = SkillGraph {
            index: nodes
                .iter()
                .enumerate()
                .map(|(i, n)| (n.id.clone(), i))
                .collect(),
            outgoing: vec![Vec::new(); nodes.len()],
            incoming: vec![Vec::new(); nodes.len()],
            nodes,
            edges: Vec::with_capacity(edges.len()),
        };
        for edge in edges {
            if edge.source >= graph.nodes.len() || edge.target >= graph.nodes.len() {
                warn!(
                    source = edge.source,
                    target = edge.target,
                    "dropping edge with out-of-range endpoint"
                );
                continue;
            }
            let idx = graph.edges.len();
            graph.outgoing[edge.source].push(idx);
            graph.incoming[edge.target].push(idx);
            graph.edges.push(edge);
        }
        graph
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, idx: usize) -> &Node {
        &self.nodes[idx]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Arena index of a node by kind and raw identifier. The raw id goes
    /// through the same identity-key normalization the loaders use, so
    /// `"007"` finds a node loaded as `7`.
    pub fn node_index(&self, kind: NodeKind, raw_id: &str) -> Option<usize> {
        self.index
            .get(&composite_id(kind, &id_key(raw_id)))
            .copied()
    }

    /// Look up a node, or create a shadow node (kind + id only) if it was
    /// never seen before. Idempotent: the identity is stable once
    /// assigned.
    pub fn ensure_node(&mut self, kind: NodeKind, raw_id: &str) -> usize {
        let key = id_key(raw_id);
        let id = composite_id(kind, &key);
        if let Some(&idx) = self.index.get(&id) {
            return idx;
        }
        let idx = self.nodes.len();
        self.nodes.push(Node {
            id: id.clone(),
            raw_id: key,
            data: NodeData::shadow(kind),
        });
        self.index.insert(id, idx);
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        idx
    }

    /// Apply attribute enrichment to an existing node: non-null fields
    /// overwrite, nulls never erase.
    pub fn enrich_node(&mut self, idx: usize, data: &NodeData) {
        self.nodes[idx].data.merge_from(data);
    }

    /// Ensure + enrich in one step.
    pub fn upsert_node(&mut self, kind: NodeKind, raw_id: &str, data: &NodeData) -> usize {
        let idx = self.ensure_node(kind, raw_id);
        self.enrich_node(idx, data);
        idx
    }

    /// Append a directed edge. Under `EdgePolicy::Deduplicate` an edge
    /// identical in (source, target, kind including attributes) is
    /// dropped, so re-importing the same rows stays idempotent while a
    /// genuine course retake (different date) is preserved. Returns
    /// whether the edge was added.
    pub fn add_edge(
        &mut self,
        source: usize,
        target: usize,
        kind: EdgeKind,
        policy: EdgePolicy,
    ) -> bool {
        if policy == EdgePolicy::Deduplicate {
            let duplicate = self.outgoing[source].iter().any(|&e| {
                let edge = &self.edges[e];
                edge.target == target && edge.kind == kind
            });
            if duplicate {
                return false;
            }
        }
        let idx = self.edges.len();
        self.outgoing[source].push(idx);
        self.incoming[target].push(idx);
        self.edges.push(Edge {
            source,
            target,
            kind,
        });
        true
    }

    /// Edges leaving a node, in insertion order.
    pub fn outgoing_edges(&self, idx: usize) -> impl Iterator<Item = &Edge> {
        self.outgoing[idx].iter().map(move |&e| &self.edges[e])
    }

    /// Edges arriving at a node, in insertion order.
    pub fn incoming_edges(&self, idx: usize) -> impl Iterator<Item = &Edge> {
        self.incoming[idx].iter().map(move |&e| &self.edges[e])
    }

    /// Full O(V+E) scan producing counts by kind.
    pub fn stats(&self) -> GraphStats {
        let mut stats = GraphStats {
            node_count: self.nodes.len(),
            edge_count: self.edges.len(),
            ..GraphStats::default()
        };
        for node in &self.nodes {
            *stats
                .nodes_by_kind
                .entry(node.kind().label().to_string())
                .or_insert(0) += 1;
        }
        for edge in &self.edges {
            *stats
                .edges_by_kind
                .entry(edge.kind.label().to_string())
                .or_insert(0) += 1;
        }
        stats
    }
}
