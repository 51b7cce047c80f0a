//! The flat token model (spec §3): one `TokenNormalized` per `$value`-bearing
//! node, carrying its resolved-or-inherited metadata, its source location,
//! and (once the resolver and graph linker have run) its alias bookkeeping.

use std::collections::{BTreeMap, HashMap};

use tinyjson::JsonValue;

use crate::group::GroupNormalized;

/// Where a token's raw value came from, kept for diagnostics (spec §6).
#[derive(Debug, Clone, PartialEq)]
pub struct SourceLocation {
    pub filename: String,
    pub pointer: String,
}

/// The lazily-built mirror of a composite `$value`'s shape used to report
/// `partialAliasOf` (spec §9): a leaf is an aliased sub-field, a map mirrors
/// an object `$value`, and `Empty` is a field with no partial alias in it.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PartialAlias {
    #[default]
    Empty,
    Leaf(String),
    Map(HashMap<String, PartialAlias>),
}

impl PartialAlias {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, PartialAlias::Empty)
    }
}

/// Per-mode resolution state (spec §4.B mode expansion, §4.E alias links).
/// Every token always has a `"."` entry for its default/unmodeed value.
///
/// `original_value` is the raw, never-mutated value as written in the
/// document; `value` starts out identical to it and is overwritten in place
/// by the resolver once its alias (if any) resolves successfully. Keeping
/// both lets the resolver follow a referenced token's *unresolved* chain
/// (spec §4.D step 4: "if the target token's mode-m originalValue is itself
/// an alias, recurse") regardless of what order tokens happen to be visited.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenModeState {
    pub value: JsonValue,
    pub original_value: JsonValue,
    pub source: Option<SourceLocation>,
    pub alias_of: Option<String>,
    pub alias_chain: Vec<String>,
}

impl TokenModeState {
    pub(crate) fn empty() -> Self {
        TokenModeState {
            value: JsonValue::Null,
            original_value: JsonValue::Null,
            source: None,
            alias_of: None,
            alias_chain: Vec::new(),
        }
    }
}

/// One normalized, flattened design token.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenNormalized {
    /// Dotted id, e.g. `color.brand.100`.
    pub id: String,
    /// JSON-Pointer-style id, e.g. `#/color/brand/100`.
    pub json_id: String,
    pub type_: Option<String>,
    pub description: Option<String>,
    pub deprecated: Option<bool>,
    pub extensions: Option<JsonValue>,
    /// The dotted id of the enclosing group, if any.
    pub group: Option<String>,
    pub source: SourceLocation,
    /// Mirrors `mode["."].value` (spec §4.D: "at mode `.`, the token's root
    /// `$value` is set from `mode['.'].$value`"). Absent until the resolver
    /// has run once.
    pub value: JsonValue,
    /// Keyed by mode name (`"."` for the unmodeed default), ascending with
    /// `.` sorted first (spec §4.B).
    pub mode: BTreeMap<String, TokenModeState>,

    // Populated by the resolver/graph linker, not the normalizer itself.
    pub alias_of: Option<String>,
    pub alias_chain: Vec<String>,
    pub aliased_by: Vec<String>,
    pub dependencies: Vec<String>,
    pub partial_alias_of: PartialAlias,
}

impl TokenNormalized {
    /// Build the bare, not-yet-resolved token for `path` from the raw
    /// `$value`/`$type`/etc. of `node`. `$type` falls back to the enclosing
    /// `group`'s cascaded `$type` when absent locally, and `$deprecated`
    /// nullish-inherits from the group the same way
    /// [`crate::group::GroupIndex::index_group`] cascades it between groups
    /// (spec §4.A/§3). `$description` and `$extensions` are taken as given
    /// on the token only — they do not cascade from the group (spec §3).
    pub fn from_node(
        path: &[String],
        node: &HashMap<String, JsonValue>,
        group: Option<&GroupNormalized>,
        source: SourceLocation,
    ) -> Self {
        let id = crate::pointer::to_dotted(path);
        let json_id = crate::pointer::to_json_id(path);

        let type_ = node
            .get("$type")
            .and_then(|v| v.get::<String>())
            .cloned()
            .or_else(|| group.and_then(|g| g.type_.clone()));

        let description = node.get("$description").and_then(|v| v.get::<String>()).cloned();

        let deprecated = node
            .get("$deprecated")
            .and_then(|v| v.get::<bool>())
            .copied()
            .or_else(|| group.and_then(|g| g.deprecated));

        let extensions = node.get("$extensions").cloned();

        let value = node.get("$value").cloned().unwrap_or(JsonValue::Null);

        let mut mode = BTreeMap::new();
        mode.insert(
            ".".to_owned(),
            TokenModeState {
                value: value.clone(),
                original_value: value.clone(),
                source: Some(source.clone()),
                alias_of: None,
                alias_chain: Vec::new(),
            },
        );

        TokenNormalized {
            id,
            json_id,
            type_,
            description,
            deprecated,
            extensions,
            value,
            group: group.map(|g| g.id.clone()),
            source,
            mode,
            alias_of: None,
            alias_chain: Vec::new(),
            aliased_by: Vec::new(),
            dependencies: Vec::new(),
            partial_alias_of: PartialAlias::Empty,
        }
    }

    /// Expand `$extensions.mode` (spec §4.B): each mode name maps to a
    /// value that replaces the default `"."` entry for that mode while
    /// keeping `"."` itself as the fallback value.
    pub fn expand_modes(&mut self) {
        let Some(extensions) = &self.extensions else {
            return;
        };
        let Some(ext_map) = extensions.get::<HashMap<String, JsonValue>>() else {
            return;
        };
        let Some(modes) = ext_map.get("mode") else {
            return;
        };
        let Some(mode_map) = modes.get::<HashMap<String, JsonValue>>() else {
            return;
        };

        let mode_source = self.mode.get(".").and_then(|state| state.source.clone());

        for (mode_name, mode_value) in mode_map {
            let source = mode_source.clone().map(|s| SourceLocation {
                filename: s.filename,
                pointer: format!("{}/$extensions/mode/{mode_name}", self.json_id),
            });
            self.mode.insert(
                mode_name.clone(),
                TokenModeState {
                    value: mode_value.clone(),
                    original_value: mode_value.clone(),
                    source,
                    alias_of: None,
                    alias_chain: Vec::new(),
                },
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obj(pairs: Vec<(&str, JsonValue)>) -> HashMap<String, JsonValue> {
        pairs.into_iter().map(|(k, v)| (k.to_owned(), v)).collect()
    }

    fn source() -> SourceLocation {
        SourceLocation {
            filename: "tokens.json".to_owned(),
            pointer: "#/color/red".to_owned(),
        }
    }

    #[test]
    fn test_from_node_inherits_from_group_when_absent() {
        let group = GroupNormalized {
            id: "color".to_owned(),
            json_id: "#/color".to_owned(),
            type_: Some("color".to_owned()),
            description: Some("palette".to_owned()),
            deprecated: Some(true),
            extensions: None,
            tokens: Vec::new(),
        };

        let node = obj(vec![("$value", JsonValue::String("#ff0000".to_owned()))]);
        let path = vec!["color".to_owned(), "red".to_owned()];
        let token = TokenNormalized::from_node(&path, &node, Some(&group), source());

        similar_asserts::assert_eq!(token.type_, Some("color".to_owned()));
        // $description is "as given" (spec §3), not cascaded from the group.
        similar_asserts::assert_eq!(token.description, None);
        assert_eq!(token.deprecated, Some(true));
    }

    #[test]
    fn test_from_node_local_false_overrides_group_true() {
        let group = GroupNormalized {
            id: "color".to_owned(),
            json_id: "#/color".to_owned(),
            type_: None,
            description: None,
            deprecated: Some(true),
            extensions: None,
            tokens: Vec::new(),
        };

        let node = obj(vec![
            ("$value", JsonValue::String("#ff0000".to_owned())),
            ("$deprecated", JsonValue::Boolean(false)),
        ]);
        let path = vec!["color".to_owned(), "red".to_owned()];
        let token = TokenNormalized::from_node(&path, &node, Some(&group), source());

        assert_eq!(token.deprecated, Some(false));
    }

    #[test]
    fn test_expand_modes_adds_named_entries_keeping_default() {
        let node = obj(vec![
            ("$value", JsonValue::String("#ff0000".to_owned())),
            (
                "$extensions",
                JsonValue::Object(obj(vec![(
                    "mode",
                    JsonValue::Object(obj(vec![(
                        "dark",
                        JsonValue::String("#cc0000".to_owned()),
                    )])),
                )])),
            ),
        ]);
        let path = vec!["color".to_owned(), "red".to_owned()];
        let mut token = TokenNormalized::from_node(&path, &node, None, source());
        token.expand_modes();

        assert_eq!(token.mode.len(), 2);
        assert!(token.mode.contains_key("."));
        assert_eq!(
            token.mode["dark"].value,
            JsonValue::String("#cc0000".to_owned())
        );
    }
}
