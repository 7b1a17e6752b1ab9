//! Condition Set - Per-Node Gating Data
//!
//! A `Conditions` value gates whether a session may move into its node. It
//! is pure data: evaluation against session state lives in `session`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// The gate attached to exactly one node.
///
/// Wire form: `{"user": bool, "flag": string|null, "state": {key: value}}`.
/// `user` defaults to `true` and `state` to empty when absent on decode;
/// `flag` is always emitted (as `null` when no flag is needed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conditions {
    /// The session must report an authenticated user.
    #[serde(rename = "user", default = "default_user_required")]
    pub user_required: bool,

    /// The session must hold this flag. `None` means no flag is needed.
    #[serde(rename = "flag", default)]
    pub flag_required: Option<String>,

    /// Every entry must be present in session state with an exactly equal
    /// value. Empty means no state constraint.
    #[serde(rename = "state", default)]
    pub state_required: BTreeMap<String, Value>,
}

impl Default for Conditions {
    fn default() -> Self {
        Self {
            user_required: true,
            flag_required: None,
            state_required: BTreeMap::new(),
        }
    }
}

fn default_user_required() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_then_encode_round_trips() {
        let wire = json!({
            "user": false,
            "flag": "fooflag",
            "state": {"a": "b", "c": "d"},
        });

        let conditions: Conditions = serde_json::from_value(wire.clone()).unwrap();
        assert_eq!(serde_json::to_value(&conditions).unwrap(), wire);
    }

    #[test]
    fn test_decode_defaults_missing_fields() {
        let conditions: Conditions = serde_json::from_value(json!({})).unwrap();

        assert!(conditions.user_required);
        assert_eq!(conditions.flag_required, None);
        assert!(conditions.state_required.is_empty());
    }

    #[test]
    fn test_encode_emits_null_flag() {
        let wire = serde_json::to_value(Conditions::default()).unwrap();

        assert_eq!(wire, json!({"user": true, "flag": null, "state": {}}));
    }
}
