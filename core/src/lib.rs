//! Colloquy Core - Branching Dialogue Engine
//!
//! A conversation is a graph of message and reply nodes. This crate owns the
//! graph data model, the per-session traversal engine, and the wire codec:
//! - `Graph` / `Node` / `Conditions`: the dialogue graph itself
//! - `Action`: the closed set of state mutations a node may carry
//! - `Session`: one conversation walk (current node + state + flags)
//! - `codec`: lossless mapping to the persisted JSON shape
//!
//! **IMPORTANT**: This layer is Pure Rust - no IO, no Async. Persistence and
//! drivers live in `colloquy-storage` and `colloquy-cli`.

pub mod action;
pub mod codec;
pub mod condition;
pub mod graph;
pub mod messenger;
pub mod node;
pub mod render;
pub mod session;

pub use action::{Action, ActionError, ActionKind};
pub use codec::{CodecError, decode_graph, decode_node, encode_graph, encode_node};
pub use condition::Conditions;
pub use graph::{Edge, Graph};
pub use messenger::button_template;
pub use node::{Node, NodeType};
pub use render::{RenderError, render};
pub use session::{Session, SessionError};
