//! Action Registry - State Mutations as Data
//!
//! Actions are the closed set of things a node may do to conversation state
//! when a session transitions into it. Instead of callbacks, a node carries
//! `(kind, raw value)` pairs; the raw value is validated once at the write
//! path and parsed into its effective form at transition time.

use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ActionError {
    /// The referenced kind is not part of the registry.
    #[error("unknown action `{0}`")]
    InvalidAction(String),

    /// The raw value's runtime shape does not match the kind's declared shape.
    #[error("invalid value for action `{kind}`: expected {expected}, got {value}")]
    InvalidValue {
        kind: &'static str,
        expected: &'static str,
        value: Value,
    },
}

/// The closed set of action kinds a node may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Wipe the whole conversation state. Value shape: boolean gate.
    ClearState,
    /// Upsert one state entry. Value shape: `"key=value"` or a bare key.
    SetState,
    /// Grant a feature flag. Value shape: the flag name.
    AddFlag,
}

impl ActionKind {
    pub const ALL: [ActionKind; 3] =
        [ActionKind::ClearState, ActionKind::SetState, ActionKind::AddFlag];

    /// Wire name used in the persisted form.
    ///
    /// The flag action serializes as `AddFeature`: existing conversation
    /// files carry that name, so it is part of the format.
    pub fn name(self) -> &'static str {
        match self {
            ActionKind::ClearState => "ClearState",
            ActionKind::SetState => "SetState",
            ActionKind::AddFlag => "AddFeature",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, ActionError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| ActionError::InvalidAction(name.to_string()))
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A validated `(kind, raw value)` pair attached to a node.
///
/// The raw value is kept verbatim so the wire form round-trips; parsing into
/// the effective form (`assignment`, trimmed flag name) happens when a
/// session applies the node.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ClearState(bool),
    SetState(String),
    AddFlag(String),
}

impl Action {
    /// Validate a raw value against `kind`'s declared shape.
    ///
    /// Returns `Ok(None)` for an empty string on the string-valued kinds:
    /// an empty `SetState`/`AddFlag` is a no-op to skip, not an error.
    pub fn new(kind: ActionKind, raw: &Value) -> Result<Option<Self>, ActionError> {
        match (kind, raw) {
            (ActionKind::ClearState, Value::Bool(gate)) => Ok(Some(Action::ClearState(*gate))),
            (ActionKind::SetState, Value::String(s)) if s.is_empty() => Ok(None),
            (ActionKind::AddFlag, Value::String(s)) if s.is_empty() => Ok(None),
            (ActionKind::SetState, Value::String(s)) => Ok(Some(Action::SetState(s.clone()))),
            (ActionKind::AddFlag, Value::String(s)) => Ok(Some(Action::AddFlag(s.clone()))),
            (ActionKind::ClearState, other) => Err(ActionError::InvalidValue {
                kind: kind.name(),
                expected: "a boolean",
                value: other.clone(),
            }),
            (_, other) => Err(ActionError::InvalidValue {
                kind: kind.name(),
                expected: "a string",
                value: other.clone(),
            }),
        }
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Action::ClearState(_) => ActionKind::ClearState,
            Action::SetState(_) => ActionKind::SetState,
            Action::AddFlag(_) => ActionKind::AddFlag,
        }
    }

    /// The raw value in its wire form.
    pub fn raw(&self) -> Value {
        match self {
            Action::ClearState(gate) => Value::Bool(*gate),
            Action::SetState(raw) | Action::AddFlag(raw) => Value::String(raw.clone()),
        }
    }

    /// Split a `SetState` raw value on the first `=`.
    ///
    /// A bare token sets that key to boolean `true`.
    pub fn parse_assignment(raw: &str) -> (&str, Value) {
        match raw.split_once('=') {
            Some((key, value)) => (key, Value::String(value.to_string())),
            None => (raw, Value::Bool(true)),
        }
    }

    /// An `AddFlag` raw value trimmed to the flag name it grants.
    pub fn parse_flag(raw: &str) -> &str {
        raw.trim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_name_round_trips_every_kind() {
        for kind in ActionKind::ALL {
            assert_eq!(ActionKind::from_name(kind.name()), Ok(kind));
        }
    }

    #[test]
    fn test_from_name_rejects_unknown_kind() {
        assert_eq!(
            ActionKind::from_name("Teleport"),
            Err(ActionError::InvalidAction("Teleport".to_string()))
        );
    }

    #[test]
    fn test_flag_action_wire_name_is_add_feature() {
        assert_eq!(ActionKind::AddFlag.name(), "AddFeature");
    }

    #[test]
    fn test_new_rejects_shape_mismatch() {
        assert!(matches!(
            Action::new(ActionKind::ClearState, &json!("yes")),
            Err(ActionError::InvalidValue { .. })
        ));
        assert!(matches!(
            Action::new(ActionKind::SetState, &json!(true)),
            Err(ActionError::InvalidValue { .. })
        ));
        assert!(matches!(
            Action::new(ActionKind::AddFlag, &json!(1)),
            Err(ActionError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_new_skips_empty_string_values() {
        assert_eq!(Action::new(ActionKind::SetState, &json!("")), Ok(None));
        assert_eq!(Action::new(ActionKind::AddFlag, &json!("")), Ok(None));
    }

    #[test]
    fn test_parse_assignment_splits_on_first_equals() {
        assert_eq!(
            Action::parse_assignment("name=Ada"),
            ("name", json!("Ada"))
        );
        assert_eq!(
            Action::parse_assignment("query=a=b"),
            ("query", json!("a=b"))
        );
    }

    #[test]
    fn test_parse_assignment_bare_token_sets_true() {
        assert_eq!(Action::parse_assignment("solo"), ("solo", json!(true)));
    }

    #[test]
    fn test_parse_flag_trims_whitespace() {
        assert_eq!(Action::parse_flag("  vip  "), "vip");
    }
}
