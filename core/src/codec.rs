//! Codec - The Persisted Wire Form
//!
//! Lossless mapping between the in-memory graph and the plain nested-mapping
//! shape stored on disk:
//!
//! ```json
//! {
//!   "nodes": [
//!     {
//!       "id": "…", "type": "message",
//!       "properties": {"is_root": true, "number": 0},
//!       "conditions": {"user": true, "flag": null, "state": {}},
//!       "copy": {"text": "Hello {name}"},
//!       "metadata": {},
//!       "actions": [["SetState", "name=Ada"]]
//!     }
//!   ],
//!   "edges": [["idA", "idB"]],
//!   "metadata": {}
//! }
//! ```
//!
//! Decode is strict where it matters: an edge naming an unknown node id or
//! an action kind outside the registry fails the whole decode, no partial
//! graph. Missing optional fields fall back to their defaults.

use crate::action::{ActionError, ActionKind};
use crate::condition::Conditions;
use crate::graph::Graph;
use crate::node::{Node, NodeType};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    /// An edge references a node id absent from the node list.
    #[error("edge references unknown node `{0}`")]
    DanglingEdge(String),

    /// A node carries a type tag outside `message` / `reply`.
    #[error("unknown node type `{0}`")]
    UnknownNodeType(String),

    /// An action kind name outside the registry, or a value shape mismatch.
    #[error(transparent)]
    Action(#[from] ActionError),

    /// The document does not have the expected nested-mapping shape.
    #[error("malformed conversation document: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Serialize, Deserialize)]
struct GraphRecord {
    #[serde(default)]
    nodes: Vec<NodeRecord>,
    #[serde(default)]
    edges: Vec<(String, String)>,
    #[serde(default)]
    metadata: Map<String, Value>,
}

#[derive(Serialize, Deserialize)]
struct NodeRecord {
    id: String,
    #[serde(rename = "type")]
    node_type: String,
    #[serde(default)]
    properties: PropertiesRecord,
    #[serde(default)]
    conditions: Conditions,
    #[serde(default)]
    copy: CopyRecord,
    #[serde(default)]
    metadata: Map<String, Value>,
    #[serde(default)]
    actions: Vec<(String, Value)>,
}

#[derive(Serialize, Deserialize, Default)]
struct PropertiesRecord {
    #[serde(default)]
    is_root: bool,
    #[serde(default)]
    number: i64,
}

#[derive(Serialize, Deserialize, Default)]
struct CopyRecord {
    #[serde(default)]
    text: String,
}

/// Encode a graph into its wire form.
pub fn encode_graph(graph: &Graph) -> Value {
    let record = GraphRecord {
        nodes: graph.nodes().map(node_record).collect(),
        edges: graph
            .edges()
            .map(|edge| {
                let (a, b) = edge.endpoints();
                (a.to_string(), b.to_string())
            })
            .collect(),
        metadata: graph.metadata.clone(),
    };
    serde_json::to_value(record).expect("graph records hold only plain JSON values")
}

/// Encode a single node into its wire form.
pub fn encode_node(node: &Node) -> Value {
    serde_json::to_value(node_record(node)).expect("node records hold only plain JSON values")
}

fn node_record(node: &Node) -> NodeRecord {
    NodeRecord {
        id: node.id().to_string(),
        node_type: node.node_type.tag().to_string(),
        properties: PropertiesRecord {
            is_root: node.is_root(),
            number: node.number,
        },
        conditions: node.conditions.clone(),
        copy: CopyRecord {
            text: node.text.clone(),
        },
        metadata: node.metadata.clone(),
        actions: node
            .actions()
            .iter()
            .map(|action| (action.kind().name().to_string(), action.raw()))
            .collect(),
    }
}

/// Decode a graph from its wire form. The inverse of [`encode_graph`].
pub fn decode_graph(value: &Value) -> Result<Graph, CodecError> {
    let record = GraphRecord::deserialize(value)?;

    let mut graph = Graph::new();
    graph.metadata = record.metadata;

    for node_record in record.nodes {
        graph.add_node(restore_node(node_record)?);
    }

    for (a, b) in record.edges {
        if !graph.add_edge(&a, &b) {
            let missing = if graph.node(&a).is_none() { a } else { b };
            return Err(CodecError::DanglingEdge(missing));
        }
    }

    Ok(graph)
}

/// Decode a single node from its wire form.
pub fn decode_node(value: &Value) -> Result<Node, CodecError> {
    restore_node(NodeRecord::deserialize(value)?)
}

fn restore_node(record: NodeRecord) -> Result<Node, CodecError> {
    let node_type = NodeType::from_tag(&record.node_type)
        .ok_or_else(|| CodecError::UnknownNodeType(record.node_type.clone()))?;

    let mut node = Node::restore(record.id, node_type)
        .with_number(record.properties.number)
        .with_text(record.copy.text);
    node.root = record.properties.is_root;
    node.conditions = record.conditions;
    node.metadata = record.metadata;

    for (name, raw) in record.actions {
        let kind = ActionKind::from_name(&name)?;
        node.add_action(kind, &raw)?;
    }

    Ok(node)
}
