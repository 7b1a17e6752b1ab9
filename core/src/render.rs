//! Render - Placeholder Substitution
//!
//! Node text is a template: every `{key}` resolves against conversation
//! state at presentation time. `{{` and `}}` escape literal braces. That is
//! the whole template language; anything richer belongs to a driver.

use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// The template names a key absent from conversation state. Whether
    /// this is fatal is the driver's call; the engine just surfaces it.
    #[error("template references `{{{0}}}` but conversation state has no such key")]
    MissingStateKey(String),

    /// A `{` without a matching `}` (or a stray `}`).
    #[error("unbalanced brace at byte {0} of template")]
    UnbalancedBrace(usize),
}

/// Substitute every `{key}` in `template` from `state`.
pub fn render(template: &str, state: &BTreeMap<String, Value>) -> Result<String, RenderError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((at, ch)) = chars.next() {
        match ch {
            '{' => {
                if matches!(chars.peek(), Some((_, '{'))) {
                    chars.next();
                    out.push('{');
                    continue;
                }
                let mut key = String::new();
                loop {
                    match chars.next() {
                        Some((_, '}')) => break,
                        Some((_, c)) => key.push(c),
                        None => return Err(RenderError::UnbalancedBrace(at)),
                    }
                }
                let value = state
                    .get(&key)
                    .ok_or_else(|| RenderError::MissingStateKey(key.clone()))?;
                out.push_str(&display(value));
            }
            '}' => {
                if matches!(chars.peek(), Some((_, '}'))) {
                    chars.next();
                    out.push('}');
                } else {
                    return Err(RenderError::UnbalancedBrace(at));
                }
            }
            _ => out.push(ch),
        }
    }

    Ok(out)
}

/// Strings render bare (no quotes); everything else uses its JSON form.
fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn state(pairs: &[(&str, Value)]) -> BTreeMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_render_substitutes_keys() {
        let state = state(&[("name", json!("Ada")), ("count", json!(3))]);

        let text = render("Welcome {name}, you have {count} messages", &state).unwrap();

        assert_eq!(text, "Welcome Ada, you have 3 messages");
    }

    #[test]
    fn test_render_bool_values() {
        let state = state(&[("solo", json!(true))]);

        assert_eq!(render("solo={solo}", &state).unwrap(), "solo=true");
    }

    #[test]
    fn test_render_missing_key_is_an_error() {
        let err = render("hi {name}", &BTreeMap::new()).unwrap_err();

        assert_eq!(err, RenderError::MissingStateKey("name".to_string()));
    }

    #[test]
    fn test_render_escaped_braces() {
        let text = render("{{not a key}}", &BTreeMap::new()).unwrap();

        assert_eq!(text, "{not a key}");
    }

    #[test]
    fn test_render_unbalanced_brace() {
        assert!(matches!(
            render("oops {name", &BTreeMap::new()),
            Err(RenderError::UnbalancedBrace(5))
        ));
        assert!(matches!(
            render("oops }", &BTreeMap::new()),
            Err(RenderError::UnbalancedBrace(5))
        ));
    }

    #[test]
    fn test_render_plain_text_passes_through() {
        assert_eq!(render("no keys here", &BTreeMap::new()).unwrap(), "no keys here");
    }
}
