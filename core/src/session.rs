//! Session - One Conversation Walk
//!
//! A `Session` drives a single conversation over a shared, effectively
//! immutable graph: it tracks the current node, the accumulated state, and
//! the granted flags. The graph is never mutated through a session; the
//! borrow makes that structural.
//!
//! Sessions are single-threaded by design. Run two conversations over the
//! same graph with two sessions, not one session from two threads.

use crate::action::Action;
use crate::graph::Graph;
use crate::node::Node;
use rand::Rng;
use rand::seq::SliceRandom;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    /// An explicit node id was not found in the graph.
    #[error("node `{0}` not found in graph")]
    NodeNotFound(String),

    /// No root node satisfies the initial eligibility conditions.
    #[error("no root node is eligible to start a conversation")]
    NoEligibleRoot,
}

/// The traversal engine for one conversation.
#[derive(Debug)]
pub struct Session<'g> {
    graph: &'g Graph,
    current: String,
    state: BTreeMap<String, Value>,
    flags: BTreeSet<String>,
    authenticated: bool,
}

impl<'g> Session<'g> {
    /// Start at a uniformly random eligible root.
    ///
    /// The RNG is injected so drivers can use a thread RNG and tests a
    /// seeded one. The entry node's actions are not applied; call
    /// [`Session::apply_current`] to opt in.
    pub fn start<R: Rng + ?Sized>(graph: &'g Graph, rng: &mut R) -> Result<Self, SessionError> {
        let mut session = Self::detached(graph);
        let eligible: Vec<&Node> = graph
            .roots()
            .filter(|root| session.can_move_to(root))
            .collect();
        let chosen = eligible.choose(rng).ok_or(SessionError::NoEligibleRoot)?;
        session.current = chosen.id().to_string();
        tracing::debug!(root = %session.current, "conversation started");
        Ok(session)
    }

    /// Start at an explicit node id.
    pub fn start_at(graph: &'g Graph, id: &str) -> Result<Self, SessionError> {
        if graph.node(id).is_none() {
            return Err(SessionError::NodeNotFound(id.to_string()));
        }
        let mut session = Self::detached(graph);
        session.current = id.to_string();
        tracing::debug!(root = %session.current, "conversation started");
        Ok(session)
    }

    fn detached(graph: &'g Graph) -> Self {
        Self {
            graph,
            current: String::new(),
            state: BTreeMap::new(),
            flags: BTreeSet::new(),
            authenticated: true,
        }
    }

    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    /// The node the conversation is resting on.
    pub fn current(&self) -> &'g Node {
        // The graph is borrowed for the whole session, so the id chosen at
        // start or by `move_to` cannot have been removed from under us.
        self.graph
            .node(&self.current)
            .expect("current id is a graph member")
    }

    /// A view of the accumulated conversation state.
    pub fn state(&self) -> &BTreeMap<String, Value> {
        &self.state
    }

    /// Whether `key` is present in state with exactly `value`.
    pub fn check_state(&self, key: &str, value: &Value) -> bool {
        self.state.get(key) == Some(value)
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }

    /// Whether this session speaks for an authenticated user. Defaults to
    /// true; drivers with a real auth notion set it at construction time.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn set_authenticated(&mut self, authenticated: bool) {
        self.authenticated = authenticated;
    }

    /// The eligibility predicate: can this session move into `node` right
    /// now? Checks run in order - user, flag, state subset - short-circuit,
    /// and have no side effects.
    pub fn can_move_to(&self, node: &Node) -> bool {
        if node.conditions.user_required && !self.authenticated {
            return false;
        }
        if let Some(flag) = &node.conditions.flag_required {
            if !self.flags.contains(flag) {
                return false;
            }
        }
        for (key, required) in &node.conditions.state_required {
            match self.state.get(key) {
                Some(value) if value == required => {}
                _ => return false,
            }
        }
        true
    }

    /// Forward neighbors of the current node this session may move into.
    /// An empty result means the conversation is over.
    pub fn next_nodes(&self) -> Vec<&'g Node> {
        self.graph
            .next_nodes(self.current())
            .into_iter()
            .filter(|candidate| self.can_move_to(candidate))
            .collect()
    }

    /// Transition into the node with `id`: apply its actions, then make it
    /// current. The only way the current node changes.
    pub fn move_to(&mut self, id: &str) -> Result<&'g Node, SessionError> {
        let node = self
            .graph
            .node(id)
            .ok_or_else(|| SessionError::NodeNotFound(id.to_string()))?;
        self.apply(node);
        tracing::debug!(from = %self.current, to = id, "transition");
        self.current = id.to_string();
        Ok(node)
    }

    /// Apply the current node's actions. Entry nodes are not applied at
    /// construction; callers that want the entry node to count opt in here.
    pub fn apply_current(&mut self) {
        self.apply(self.current());
    }

    /// Apply a node's actions in two passes: one clear first if any
    /// `ClearState(true)` exists anywhere in the list, then every
    /// `SetState`/`AddFlag` in declared order. The split means a same-node
    /// `SetState` always survives a same-node clear, wherever the clear
    /// was declared.
    fn apply(&mut self, node: &Node) {
        if node
            .actions()
            .iter()
            .any(|action| matches!(action, Action::ClearState(true)))
        {
            tracing::debug!(node = node.id(), "state cleared");
            self.state.clear();
        }

        for action in node.actions() {
            match action {
                Action::SetState(raw) => {
                    let (key, value) = Action::parse_assignment(raw);
                    tracing::debug!(node = node.id(), key, "state set");
                    self.state.insert(key.to_string(), value);
                }
                Action::AddFlag(raw) => {
                    let flag = Action::parse_flag(raw);
                    tracing::debug!(node = node.id(), flag, "flag granted");
                    self.flags.insert(flag.to_string());
                }
                Action::ClearState(_) => {}
            }
        }
    }
}
