//! Node - A Dialogue Graph Vertex

use crate::action::{Action, ActionError, ActionKind};
use crate::condition::Conditions;
use serde_json::{Map, Value};
use uuid::Uuid;

/// What a node is to the person on the other end of the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// Narration or prompt text, a resting point in the conversation.
    Message,
    /// A user-selectable option. Never a resting point: a session entering
    /// a reply is expected to advance again immediately.
    Reply,
}

impl NodeType {
    /// Wire tag used in the persisted form.
    pub fn tag(self) -> &'static str {
        match self {
            NodeType::Message => "message",
            NodeType::Reply => "reply",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "message" => Some(NodeType::Message),
            "reply" => Some(NodeType::Reply),
            _ => None,
        }
    }
}

/// One vertex of a dialogue graph.
///
/// `number` is a local ordering key, not a global sequence: an edge is
/// walked from the lower-numbered node to the higher-numbered one, so
/// "forward" is a property of the numbers, not of the edge itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: String,
    pub node_type: NodeType,
    pub number: i64,
    pub root: bool,
    /// Display template; `{key}` placeholders resolve against session state
    /// at presentation time.
    pub text: String,
    pub conditions: Conditions,
    actions: Vec<Action>,
    /// Open bag preserved verbatim through the codec and never interpreted
    /// by the engine (editors keep canvas coordinates here).
    pub metadata: Map<String, Value>,
}

impl Node {
    /// Create a node with a fresh identity.
    pub fn new(node_type: NodeType) -> Self {
        Self::restore(Uuid::new_v4().simple().to_string(), node_type)
    }

    /// Rebuild a node around an existing identity (decode path).
    pub(crate) fn restore(id: String, node_type: NodeType) -> Self {
        Self {
            id,
            node_type,
            number: 0,
            root: false,
            text: String::new(),
            conditions: Conditions::default(),
            actions: Vec::new(),
            metadata: Map::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_number(mut self, number: i64) -> Self {
        self.number = number;
        self
    }

    pub fn as_root(mut self) -> Self {
        self.root = true;
        self
    }

    /// Identity assigned at creation, immutable thereafter.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_root(&self) -> bool {
        self.root
    }

    /// Attach an action. This is the sole write path for actions: the raw
    /// value is validated against the kind's declared shape here, and an
    /// empty string on the string-valued kinds is dropped as a no-op.
    pub fn add_action(&mut self, kind: ActionKind, raw: &Value) -> Result<(), ActionError> {
        if let Some(action) = Action::new(kind, raw)? {
            self.actions.push(action);
        }
        Ok(())
    }

    /// Remove every attached action matching `kind` and `raw` exactly.
    pub fn remove_action(&mut self, kind: ActionKind, raw: &Value) {
        self.actions
            .retain(|action| !(action.kind() == kind && action.raw() == *raw));
    }

    /// Attached actions in declaration order.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_assigns_unique_ids() {
        let a = Node::new(NodeType::Message);
        let b = Node::new(NodeType::Message);

        assert_ne!(a.id(), b.id());
        assert_eq!(a.id().len(), 32);
    }

    #[test]
    fn test_add_action_validates_shape() {
        let mut node = Node::new(NodeType::Message);

        assert!(node.add_action(ActionKind::SetState, &json!("x=1")).is_ok());
        assert!(
            node.add_action(ActionKind::ClearState, &json!("nope"))
                .is_err()
        );
        assert_eq!(node.actions().len(), 1);
    }

    #[test]
    fn test_add_action_drops_empty_string() {
        let mut node = Node::new(NodeType::Message);

        node.add_action(ActionKind::AddFlag, &json!("")).unwrap();

        assert!(node.actions().is_empty());
    }

    #[test]
    fn test_remove_action_matches_kind_and_value() {
        let mut node = Node::new(NodeType::Message);
        node.add_action(ActionKind::SetState, &json!("x=1")).unwrap();
        node.add_action(ActionKind::SetState, &json!("y=2")).unwrap();
        node.add_action(ActionKind::AddFlag, &json!("vip")).unwrap();

        node.remove_action(ActionKind::SetState, &json!("x=1"));

        let kept: Vec<Value> = node.actions().iter().map(Action::raw).collect();
        assert_eq!(kept, vec![json!("y=2"), json!("vip")]);
    }

    #[test]
    fn test_node_type_tags() {
        assert_eq!(NodeType::Message.tag(), "message");
        assert_eq!(NodeType::from_tag("reply"), Some(NodeType::Reply));
        assert_eq!(NodeType::from_tag("monologue"), None);
    }
}
