//! Graph - The Dialogue Graph Container
//!
//! Nodes keyed by id plus an undirected edge set. Edges carry no direction
//! of their own; traversal derives "forward" from the node `number`
//! ordering (see `Graph::next_nodes`).

use crate::node::Node;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// An undirected adjacency between two node ids.
///
/// Stored canonically as a sorted pair, so `between(a, b)` and
/// `between(b, a)` are the same edge and the edge set stays duplicate-free.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge {
    lo: String,
    hi: String,
}

impl Edge {
    pub fn between(a: &str, b: &str) -> Self {
        if a <= b {
            Self {
                lo: a.to_string(),
                hi: b.to_string(),
            }
        } else {
            Self {
                lo: b.to_string(),
                hi: a.to_string(),
            }
        }
    }

    /// Canonical (sorted) endpoint pair.
    pub fn endpoints(&self) -> (&str, &str) {
        (&self.lo, &self.hi)
    }

    /// The endpoint opposite `id`, if `id` is an endpoint at all.
    pub fn other(&self, id: &str) -> Option<&str> {
        if self.lo == id {
            Some(&self.hi)
        } else if self.hi == id {
            Some(&self.lo)
        } else {
            None
        }
    }
}

/// The set of nodes and edges making up one conversation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    nodes: BTreeMap<String, Node>,
    edges: BTreeSet<Edge>,
    /// Open graph-level bag, preserved verbatim and never interpreted.
    pub metadata: Map<String, Value>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, replacing any existing node with the same id.
    pub fn add_node(&mut self, node: Node) {
        self.nodes.insert(node.id().to_string(), node);
    }

    /// Remove a node and eagerly prune its incident edges. Callers never
    /// need to clean edges up themselves.
    pub fn remove_node(&mut self, id: &str) -> Option<Node> {
        let removed = self.nodes.remove(id);
        if removed.is_some() {
            self.edges.retain(|edge| edge.other(id).is_none());
        }
        removed
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Nodes eligible to start a conversation.
    pub fn roots(&self) -> impl Iterator<Item = &Node> {
        self.nodes().filter(|node| node.is_root())
    }

    /// Connect two nodes. Returns `false` without inserting when either
    /// endpoint is not present in the graph.
    pub fn add_edge(&mut self, a: &str, b: &str) -> bool {
        if !self.nodes.contains_key(a) || !self.nodes.contains_key(b) {
            return false;
        }
        self.edges.insert(Edge::between(a, b));
        true
    }

    /// Enumerate edges, silently skipping any whose endpoint has since been
    /// removed. A normalizing read, not an error and not a mutation.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(|edge| {
            let (a, b) = edge.endpoints();
            self.nodes.contains_key(a) && self.nodes.contains_key(b)
        })
    }

    /// All nodes sharing an edge with `id`.
    pub fn neighbors(&self, id: &str) -> impl Iterator<Item = &Node> {
        self.edges()
            .filter_map(move |edge| edge.other(id))
            .filter_map(|other| self.nodes.get(other))
    }

    /// Neighbors of `node` that lie forward of it: strictly greater
    /// `number`. Equal or lower numbers are never offered, which is what
    /// keeps undirected edges from looping a conversation backwards.
    pub fn next_nodes(&self, node: &Node) -> Vec<&Node> {
        self.neighbors(node.id())
            .filter(|neighbor| neighbor.number > node.number)
            .collect()
    }
}
