//! Messenger - Prompt + Button Projection
//!
//! Projects the read side of a session (state, current message node, reply
//! candidates) into the button-template payload messaging platforms expect.
//! Purely a transform: nothing here mutates session state.

use crate::node::Node;
use crate::render::{RenderError, render};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// The outer payload: `{"type": "template", "payload": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ButtonTemplate {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub payload: ButtonPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ButtonPayload {
    pub template_type: &'static str,
    /// The current node's text, rendered against state.
    pub text: String,
    pub buttons: Vec<Button>,
}

/// One selectable reply: rendered title plus the reply node's id as an
/// opaque callback payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Button {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub title: String,
    pub payload: String,
}

/// Build the button-template payload for a message node and its currently
/// reachable replies. Rendering errors propagate untouched.
pub fn button_template(
    state: &BTreeMap<String, Value>,
    node: &Node,
    replies: &[&Node],
) -> Result<ButtonTemplate, RenderError> {
    let buttons = replies
        .iter()
        .map(|reply| {
            Ok(Button {
                kind: "postback",
                title: render(&reply.text, state)?,
                payload: reply.id().to_string(),
            })
        })
        .collect::<Result<Vec<_>, RenderError>>()?;

    Ok(ButtonTemplate {
        kind: "template",
        payload: ButtonPayload {
            template_type: "button",
            text: render(&node.text, state)?,
            buttons,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeType;
    use serde_json::json;

    #[test]
    fn test_button_template_shape() {
        let node = Node::new(NodeType::Message).with_text("Hello {name}");
        let yes = Node::new(NodeType::Reply).with_number(1).with_text("yes");
        let no = Node::new(NodeType::Reply).with_number(1).with_text("no");
        let state = [("name".to_string(), json!("Ada"))].into_iter().collect();

        let message = button_template(&state, &node, &[&yes, &no]).unwrap();

        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({
                "type": "template",
                "payload": {
                    "template_type": "button",
                    "text": "Hello Ada",
                    "buttons": [
                        {"type": "postback", "title": "yes", "payload": yes.id()},
                        {"type": "postback", "title": "no", "payload": no.id()},
                    ],
                },
            })
        );
    }

    #[test]
    fn test_button_template_propagates_render_errors() {
        let node = Node::new(NodeType::Message).with_text("Hello {name}");

        let result = button_template(&BTreeMap::new(), &node, &[]);

        assert_eq!(
            result.unwrap_err(),
            RenderError::MissingStateKey("name".to_string())
        );
    }
}
