//! The Document Walker (spec §4.A): a depth-first traversal over a parsed
//! document, classifying each object node as a *token* or a *group* and
//! driving the group indexer and token normalizer accordingly.

use std::collections::HashMap;

use tinyjson::JsonValue;

use crate::{
    config::Ignore,
    document::Document,
    group::GroupIndex,
    pointer,
    token::{SourceLocation, TokenNormalized},
};

/// Output of a single document's walk: every group discovered, every
/// surviving token keyed by its dotted id, and the order tokens were first
/// encountered in (consumed by the resolver for deterministic iteration).
pub struct WalkResult {
    pub groups: GroupIndex,
    pub tokens: HashMap<String, TokenNormalized>,
    pub order: Vec<String>,
}

/// Walk `document`, dropping any token `ignore` rejects before it ever
/// reaches the token set (spec §4.C step 7).
pub fn walk(document: &Document, ignore: &Ignore) -> WalkResult {
    let mut result = WalkResult {
        groups: GroupIndex::new(),
        tokens: HashMap::new(),
        order: Vec::new(),
    };

    if let Some(root) = document.root_object() {
        let mut path = Vec::new();
        walk_node(root, &mut path, &document.filename, ignore, &mut result);
    }

    tracing::debug!(
        filename = %document.filename,
        tokens = result.order.len(),
        "walked document"
    );

    result
}

/// `true` iff `node` is classified as a token (spec §4.A): an Object with a
/// `$value` member. Whether `$extensions` is an ancestor is enforced by
/// never descending into a `$extensions` member in the first place (see the
/// key filter in the recursive call below), so this function never has to
/// ask.
fn is_token_node(node: &HashMap<String, JsonValue>) -> bool {
    node.contains_key("$value")
}

fn walk_node(
    node: &HashMap<String, JsonValue>,
    path: &mut Vec<String>,
    filename: &str,
    ignore: &Ignore,
    result: &mut WalkResult,
) {
    if is_token_node(node) {
        normalize_token(node, path, filename, ignore, result);
        return;
    }

    result.groups.index_group(path, node);

    let mut child_keys: Vec<&String> = node.keys().filter(|key| !key.starts_with('$')).collect();
    child_keys.sort();

    for key in child_keys {
        if let Some(JsonValue::Object(child)) = node.get(key) {
            path.push(key.clone());
            walk_node(child, path, filename, ignore, result);
            path.pop();
        }
    }
}

/// The Token Normalizer (spec §4.C): build a [`TokenNormalized`] from a
/// token-classified node, expand its modes, register it under its enclosing
/// group, and apply `ignore` last so dropped tokens never leave a dangling
/// mode entry or group registration behind.
fn normalize_token(
    node: &HashMap<String, JsonValue>,
    path: &[String],
    filename: &str,
    ignore: &Ignore,
    result: &mut WalkResult,
) {
    let group = if path.len() > 1 {
        let parent_json_id = pointer::to_json_id(&path[..path.len() - 1]);
        result.groups.get(&parent_json_id).cloned()
    } else {
        None
    };

    let source = SourceLocation {
        filename: filename.to_owned(),
        pointer: format!("{}/$value", pointer::to_json_id(path)),
    };

    let mut token = TokenNormalized::from_node(path, node, group.as_ref(), source);
    token.expand_modes();

    if ignore.deprecated && token.deprecated.unwrap_or(false) {
        return;
    }
    if ignore.matches(&token.id) {
        return;
    }

    if path.len() > 1 {
        let parent_json_id = pointer::to_json_id(&path[..path.len() - 1]);
        result.groups.register_token(&parent_json_id, &token.id);
    }

    result.order.push(token.id.clone());
    result.tokens.insert(token.id.clone(), token);
}

#[cfg(test)]
mod tests {
    use super::*;
    use glob::Pattern;
    use indoc::indoc;

    fn ignore(deprecated: bool, patterns: Vec<&str>) -> Ignore {
        Ignore::for_test(deprecated, patterns.into_iter().map(|p| Pattern::new(p).unwrap()).collect())
    }

    #[test]
    fn test_walk_classifies_tokens_and_groups() {
        let src = indoc! {r#"
            {
              "color": {
                "$type": "color",
                "red": { "$value": "#ff0000" },
                "brand": {
                  "100": { "$value": "#ffdddd" }
                }
              }
            }
        "#};
        let document = Document::parse("tokens.json", src).unwrap();
        let result = walk(&document, &ignore(false, vec![]));

        assert_eq!(result.tokens.len(), 2);
        assert_eq!(result.tokens["color.red"].type_, Some("color".to_owned()));
        assert_eq!(result.tokens["color.brand.100"].type_, Some("color".to_owned()));
        // `tokens` holds only directly-nested tokens (spec §3); `color.brand.100`
        // belongs to `#/color/brand`, not `#/color`.
        assert_eq!(result.groups.get("#/color").unwrap().tokens, vec!["color.red"]);
    }

    #[test]
    fn test_walk_drops_deprecated_when_ignored() {
        let src = indoc! {r#"
            {
              "color": {
                "legacy": { "$value": "#000000", "$deprecated": true },
                "red": { "$value": "#ff0000" }
              }
            }
        "#};
        let document = Document::parse("tokens.json", src).unwrap();
        let result = walk(&document, &ignore(true, vec![]));

        assert_eq!(result.tokens.len(), 1);
        assert!(result.tokens.contains_key("color.red"));
        assert!(!result.groups.get("#/color").unwrap().tokens.contains(&"color.legacy".to_owned()));
    }

    #[test]
    fn test_walk_drops_tokens_matching_ignore_glob() {
        let src = indoc! {r#"
            {
              "color": {
                "legacy": { "$value": "#000000" },
                "red": { "$value": "#ff0000" }
              }
            }
        "#};
        let document = Document::parse("tokens.json", src).unwrap();
        let result = walk(&document, &ignore(false, vec!["color.legacy"]));

        assert_eq!(result.tokens.len(), 1);
        assert!(result.tokens.contains_key("color.red"));
    }

    #[test]
    fn test_walk_does_not_descend_into_extensions() {
        let src = indoc! {r#"
            {
              "color": {
                "red": {
                  "$value": "#ff0000",
                  "$extensions": { "mode": { "dark": "#cc0000" } }
                }
              }
            }
        "#};
        let document = Document::parse("tokens.json", src).unwrap();
        let result = walk(&document, &ignore(false, vec![]));

        assert_eq!(result.tokens.len(), 1);
        assert_eq!(result.tokens["color.red"].mode.len(), 2);
        assert!(result.tokens["color.red"].mode.contains_key("dark"));
    }
}
