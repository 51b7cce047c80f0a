//! The Graph Linker (spec §4.E): the final pass over the resolver's
//! `ModeRefMap`, populating `aliasOf`, `aliasChain`, `aliasedBy`,
//! `dependencies`, and `partialAliasOf` on the flat token set.

use std::{cmp::Ordering, collections::HashMap};

use crate::{
    pointer,
    resolver::ModeRefMap,
    token::{PartialAlias, TokenModeState, TokenNormalized},
};

/// Locale-independent, numeric-aware comparison (spec §4.E, §8: `"x10"`
/// sorts after `"x2"`). Used everywhere the spec requires natural ascending
/// order: a group's `tokens`, and a token's `aliasedBy`/`dependencies`.
pub(crate) fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut a = a.chars().peekable();
    let mut b = b.chars().peekable();

    loop {
        match (a.peek(), b.peek()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(ca), Some(cb)) => {
                if ca.is_ascii_digit() && cb.is_ascii_digit() {
                    let na = take_number(&mut a);
                    let nb = take_number(&mut b);
                    match na.cmp(&nb) {
                        Ordering::Equal => continue,
                        other => return other,
                    }
                }
                match ca.cmp(cb) {
                    Ordering::Equal => {
                        a.next();
                        b.next();
                    }
                    other => return other,
                }
            }
        }
    }
}

fn take_number(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> u128 {
    let mut value: u128 = 0;
    while let Some(c) = chars.peek() {
        if let Some(d) = c.to_digit(10) {
            value = value.saturating_mul(10).saturating_add(u128::from(d));
            chars.next();
        } else {
            break;
        }
    }
    value
}

/// Sort `items` naturally and dedup, the shape every alias/dependency list
/// the spec requires is emitted in.
pub(crate) fn natural_sort_dedup(items: &mut Vec<String>) {
    items.sort_by(|a, b| natural_cmp(a, b));
    items.dedup();
}

/// Walk `mode_refs` (keyed `mode -> site pointer -> {filename, ref_chain}`)
/// and populate every token's alias/link fields, per spec §4.E steps 1-6.
pub fn link(tokens: &mut HashMap<String, TokenNormalized>, mode_refs: &ModeRefMap) {
    // Collect (mode, site, chain) ahead of mutation so field population
    // below can borrow `tokens` mutably per entry without fighting the
    // immutable `mode_refs` borrow.
    let mut entries: Vec<(&str, &str, &[String])> = Vec::new();
    for (mode, sites) in mode_refs {
        for (site, site_ref) in sites {
            entries.push((mode, site, &site_ref.ref_chain));
        }
    }
    // Deterministic iteration: mode `.` first, then ascending; site ascending.
    entries.sort_by(|(mode_a, site_a, _), (mode_b, site_b, _)| {
        mode_order(mode_a)
            .cmp(&mode_order(mode_b))
            .then_with(|| natural_cmp(mode_a, mode_b))
            .then_with(|| natural_cmp(site_a, site_b))
    });

    for (mode, site, ref_chain) in entries {
        let Some(root_ref) = strip_value_suffix(site) else {
            continue;
        };
        let Some(root_id) = pointer::token_id_from_ref(&format!("{root_ref}/$value")) else {
            continue;
        };

        let chain_ids: Vec<String> = ref_chain
            .iter()
            .filter_map(|r| pointer::token_id_from_ref(r))
            .collect();

        // 2. Dependencies.
        if let Some(token) = tokens.get_mut(&root_id) {
            token.dependencies.extend(ref_chain.iter().cloned());
            natural_sort_dedup(&mut token.dependencies);
        }

        let sub_path = site.strip_prefix(&format!("{root_ref}/$value")).unwrap_or("");
        let sub_path = sub_path.trim_start_matches('/');

        if sub_path.is_empty() {
            // 3. Top-level alias.
            if let (Some(token), Some(target)) = (tokens.get_mut(&root_id), chain_ids.last()) {
                let state = token
                    .mode
                    .entry(mode.to_owned())
                    .or_insert_with(TokenModeState::empty);
                state.alias_of = Some(target.clone());
                state.alias_chain = chain_ids.clone();
            }
        } else if let Some(token) = tokens.get_mut(&root_id) {
            // 4. Partial alias.
            if let Some(target) = chain_ids.last() {
                let segments: Vec<&str> = sub_path.split('/').collect();
                token.partial_alias_of.set(&segments, target.clone());
            }
        }

        // 5. Reverse links: every token in the chain is depended on by
        // root_id and by every earlier hop in the chain.
        let mut upstream = vec![root_id.clone()];
        for downstream in &chain_ids {
            for u in &upstream {
                if u != downstream {
                    if let Some(target_token) = tokens.get_mut(downstream) {
                        target_token.aliased_by.push(u.clone());
                        natural_sort_dedup(&mut target_token.aliased_by);
                    }
                }
            }
            upstream.push(downstream.clone());
        }
    }

    // 6. Promote mode `.` alias fields to the token root.
    for token in tokens.values_mut() {
        if let Some(default_mode) = token.mode.get(".") {
            token.alias_of = default_mode.alias_of.clone();
            token.alias_chain = default_mode.alias_chain.clone();
        }
    }
}

fn mode_order(mode: &str) -> u8 {
    if mode == "." {
        0
    } else {
        1
    }
}

/// Strip a trailing `/$value` (and anything after it) from a site pointer,
/// yielding the owning token's ref (spec §4.E step 1).
fn strip_value_suffix(site: &str) -> Option<&str> {
    site.find("/$value").map(|idx| &site[..idx]).or(Some(site))
}

impl PartialAlias {
    /// Set the leaf at `segments` to `target`, lazily building arrays/maps
    /// along the way to mirror `$value`'s own shape (spec §9).
    pub(crate) fn set(&mut self, segments: &[&str], target: String) {
        if segments.is_empty() {
            *self = PartialAlias::Leaf(target);
            return;
        }

        let key = segments[0];
        if let PartialAlias::Map(map) = self {
            let entry = map.entry(key.to_owned()).or_insert(PartialAlias::Empty);
            entry.set(&segments[1..], target);
        } else {
            let mut map = HashMap::new();
            let mut entry = PartialAlias::Empty;
            entry.set(&segments[1..], target);
            map.insert(key.to_owned(), entry);
            *self = PartialAlias::Map(map);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_natural_cmp_numeric_runs() {
        let mut values = vec!["x10", "x2", "x1"];
        values.sort_by(|a, b| natural_cmp(a, b));
        assert_eq!(values, vec!["x1", "x2", "x10"]);
    }

    #[test]
    fn test_natural_cmp_lexicographic_fallback() {
        assert_eq!(natural_cmp("apple", "banana"), Ordering::Less);
        assert_eq!(natural_cmp("same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_partial_alias_set_nested() {
        let mut partial = PartialAlias::Empty;
        partial.set(&["color"], "color.red".to_owned());
        match &partial {
            PartialAlias::Map(map) => {
                assert_eq!(map.get("color"), Some(&PartialAlias::Leaf("color.red".to_owned())));
            }
            _ => panic!("expected a map"),
        }
    }
}
