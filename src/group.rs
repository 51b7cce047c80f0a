//! The group index (spec §4.A): tracks every group node's cascading
//! `$type`/`$description`/`$deprecated` and the dotted ids of the tokens
//! nested under it. Grounded on the teacher's `parser/group.rs::Group`,
//! generalized from "collect a Rust-codegen tree" to "cascade DTCG group
//! properties down to every descendant."

use std::collections::{BTreeMap, HashMap};

use tinyjson::JsonValue;

use crate::{graph, pointer};

/// A single normalized group, after ancestor cascade and local overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupNormalized {
    pub id: String,
    pub json_id: String,
    pub type_: Option<String>,
    pub description: Option<String>,
    pub deprecated: Option<bool>,
    pub extensions: Option<JsonValue>,
    /// Dotted ids of tokens belonging directly to this group (not nested
    /// descendant groups' tokens), naturally sorted (spec §3).
    pub tokens: Vec<String>,
}

impl GroupNormalized {
    fn empty(json_id: &str) -> Self {
        GroupNormalized {
            id: pointer::dotted_from_json_id(json_id),
            json_id: json_id.to_owned(),
            type_: None,
            description: None,
            deprecated: None,
            extensions: None,
            tokens: Vec::new(),
        }
    }
}

/// The full set of groups discovered in a document, keyed by `json_id` so
/// ancestor lookups can be done by string-prefix over a sorted map.
#[derive(Debug, Default)]
pub struct GroupIndex {
    groups: BTreeMap<String, GroupNormalized>,
}

impl GroupIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Index the group at `path`, cascading `$type`/`$description`/
    /// `$deprecated` down from every proper-prefix ancestor already indexed,
    /// then applying `node`'s own members as local overrides. Only fields
    /// absent after the cascade are inherited — an explicit local value,
    /// including `$deprecated: false`, always wins (spec §4.A).
    pub fn index_group(&mut self, path: &[String], node: &HashMap<String, JsonValue>) -> &GroupNormalized {
        let json_id = pointer::to_json_id(path);
        self.groups
            .entry(json_id.clone())
            .or_insert_with(|| GroupNormalized::empty(&json_id));

        let ancestor_ids: Vec<String> = self
            .groups
            .keys()
            .filter(|candidate| pointer::is_proper_prefix(candidate, &json_id))
            .cloned()
            .collect();

        for ancestor_id in ancestor_ids {
            let (type_, description, deprecated) = {
                let ancestor = &self.groups[&ancestor_id];
                (ancestor.type_.clone(), ancestor.description.clone(), ancestor.deprecated)
            };
            let current = self.groups.get_mut(&json_id).expect("just inserted above");
            if current.type_.is_none() {
                current.type_ = type_;
            }
            if current.description.is_none() {
                current.description = description;
            }
            if current.deprecated.is_none() {
                current.deprecated = deprecated;
            }
        }

        let current = self.groups.get_mut(&json_id).expect("just inserted above");
        if let Some(type_) = node.get("$type").and_then(|v| v.get::<String>()) {
            current.type_ = Some(type_.clone());
        }
        if let Some(description) = node.get("$description").and_then(|v| v.get::<String>()) {
            current.description = Some(description.clone());
        }
        if let Some(deprecated) = node.get("$deprecated").and_then(|v| v.get::<bool>()) {
            current.deprecated = Some(*deprecated);
        }
        if let Some(extensions) = node.get("$extensions") {
            current.extensions = Some(extensions.clone());
        }

        &self.groups[&json_id]
    }

    /// Record that `token_id` (dotted) lives under the group identified by
    /// `group_json_id`, creating an empty group entry if one wasn't indexed
    /// yet (a token can precede its own enclosing group node in unusual
    /// traversal orders). Keeps `tokens` deduped and naturally sorted.
    pub fn register_token(&mut self, group_json_id: &str, token_id: &str) {
        let group = self
            .groups
            .entry(group_json_id.to_owned())
            .or_insert_with(|| GroupNormalized::empty(group_json_id));

        if !group.tokens.iter().any(|existing| existing == token_id) {
            group.tokens.push(token_id.to_owned());
            group.tokens.sort_by(|a, b| graph::natural_cmp(a, b));
        }
    }

    #[must_use]
    pub fn get(&self, json_id: &str) -> Option<&GroupNormalized> {
        self.groups.get(json_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GroupNormalized> {
        self.groups.values()
    }

    /// Fold another document's group index into this one (spec §5: multiple
    /// sources share one group/token space). A group present in both keeps
    /// `self`'s cascaded metadata but unions both documents' token lists.
    pub fn merge(&mut self, other: GroupIndex) {
        for (json_id, incoming) in other.groups {
            match self.groups.get_mut(&json_id) {
                Some(existing) => {
                    for token_id in incoming.tokens {
                        if !existing.tokens.iter().any(|t| *t == token_id) {
                            existing.tokens.push(token_id);
                        }
                    }
                    existing.tokens.sort_by(|a, b| graph::natural_cmp(a, b));
                }
                None => {
                    self.groups.insert(json_id, incoming);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obj(pairs: Vec<(&str, JsonValue)>) -> HashMap<String, JsonValue> {
        pairs.into_iter().map(|(k, v)| (k.to_owned(), v)).collect()
    }

    #[test]
    fn test_index_group_cascades_type_from_ancestor() {
        let mut index = GroupIndex::new();
        index.index_group(
            &["color".to_owned()],
            &obj(vec![("$type", JsonValue::String("color".to_owned()))]),
        );
        let brand = index.index_group(&["color".to_owned(), "brand".to_owned()], &obj(vec![]));

        assert_eq!(brand.type_, Some("color".to_owned()));
    }

    #[test]
    fn test_index_group_local_override_wins() {
        let mut index = GroupIndex::new();
        index.index_group(
            &["color".to_owned()],
            &obj(vec![("$deprecated", JsonValue::Boolean(true))]),
        );
        let brand = index.index_group(
            &["color".to_owned(), "brand".to_owned()],
            &obj(vec![("$deprecated", JsonValue::Boolean(false))]),
        );

        assert_eq!(brand.deprecated, Some(false));
    }

    #[test]
    fn test_index_group_does_not_inherit_from_non_ancestor() {
        let mut index = GroupIndex::new();
        index.index_group(
            &["colorful".to_owned()],
            &obj(vec![("$type", JsonValue::String("color".to_owned()))]),
        );
        let sibling = index.index_group(&["color".to_owned()], &obj(vec![]));

        assert_eq!(sibling.type_, None);
    }

    #[test]
    fn test_register_token_dedups_and_sorts_naturally() {
        let mut index = GroupIndex::new();
        index.register_token("#/spacing", "spacing.x10");
        index.register_token("#/spacing", "spacing.x2");
        index.register_token("#/spacing", "spacing.x2");

        let group = index.get("#/spacing").unwrap();
        similar_asserts::assert_eq!(group.tokens, vec!["spacing.x2", "spacing.x10"]);
    }
}
