//! The Alias Resolver (spec §4.D): walks every token's per-mode `$value`,
//! substitutes resolved aliases in place, and records every reference site
//! in a [`ModeRefMap`] for the graph linker to consume.

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use tinyjson::JsonValue;

use crate::{
    diagnostic::{Diagnostic, DiagnosticKind, Logger},
    pointer,
    token::TokenNormalized,
    types::alias::Alias,
};

/// The nested-alias slot table for composite `$type`s (spec §4.D, encoded
/// verbatim from the table the spec requires implementers to carry).
fn composite_slots(type_name: &str) -> Option<&'static [(&'static str, &'static [&'static str])]> {
    match type_name {
        "border" => Some(&[
            ("color", &["color"]),
            ("stroke", &["strokeStyle"]),
            ("width", &["dimension"]),
        ]),
        "gradient" => Some(&[("color", &["color"]), ("position", &["number"])]),
        "shadow" => Some(&[
            ("color", &["color"]),
            ("offsetX", &["dimension"]),
            ("offsetY", &["dimension"]),
            ("blur", &["dimension"]),
            ("spread", &["dimension"]),
            ("inset", &["boolean"]),
        ]),
        "strokeStyle" => Some(&[("dashArray", &["dimension"])]),
        "transition" => Some(&[
            ("duration", &["duration"]),
            ("delay", &["duration"]),
            ("timingFunction", &["cubicBezier"]),
        ]),
        "typography" => Some(&[
            ("fontFamily", &["fontFamily"]),
            ("fontWeight", &["fontWeight"]),
            ("fontSize", &["dimension"]),
            ("lineHeight", &["dimension", "number"]),
            ("letterSpacing", &["dimension"]),
        ]),
        _ => None,
    }
}

/// One recorded alias reference site: the chain of `$ref`s walked (in order,
/// target-last) to reach a non-alias terminal token.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteRef {
    pub filename: String,
    pub ref_chain: Vec<String>,
}

/// `mode -> site pointer -> SiteRef`, the structure the graph linker
/// consumes (spec §4.E).
pub type ModeRefMap = BTreeMap<String, BTreeMap<String, SiteRef>>;

enum AliasFailure {
    Unresolved(String),
    Circular(Vec<String>),
}

/// Follow `alias_str` (already known to match the `{a.b.c}` shape) through
/// zero or more transitive hops to a non-alias terminal token, per spec
/// §4.D steps 1-5. `chain` accumulates every `$ref` visited so far in *this*
/// resolution and doubles as cycle detection.
fn resolve_alias(
    alias_str: &str,
    mode: &str,
    tokens: &HashMap<String, TokenNormalized>,
    chain: &mut Vec<String>,
) -> Result<String, AliasFailure> {
    let alias = Alias::from_str(alias_str).expect("caller already checked is_alias_str");
    let ref_str = alias.to_ref();

    if chain.contains(&ref_str) {
        let mut cycle = chain.clone();
        cycle.push(ref_str);
        return Err(AliasFailure::Circular(cycle));
    }

    let target_id = pointer::token_id_from_ref(&ref_str).ok_or_else(|| AliasFailure::Unresolved(alias.dotted()))?;
    let target = tokens
        .get(&target_id)
        .ok_or_else(|| AliasFailure::Unresolved(alias.dotted()))?;

    chain.push(ref_str);

    let target_mode = target
        .mode
        .get(mode)
        .or_else(|| target.mode.get("."))
        .ok_or_else(|| AliasFailure::Unresolved(alias.dotted()))?;

    if let Some(s) = target_mode.original_value.get::<String>() {
        if Alias::is_alias_str(s) {
            return resolve_alias(s, mode, tokens, chain);
        }
    }

    Ok(target.json_id.clone())
}

/// Resolve `value` at `path` (the full site pointer segments, rooted at the
/// token's own `jsonID`) against `expected_types`, recursing through arrays
/// and composite-type objects per spec §4.D's tri-branch dispatch, recording
/// every successfully or partially resolved alias site into `site_refs`.
fn resolve_value(
    value: &JsonValue,
    expected_types: &[String],
    path: &[String],
    mode: &str,
    filename: &str,
    tokens: &HashMap<String, TokenNormalized>,
    logger: &dyn Logger,
    site_refs: &mut BTreeMap<String, SiteRef>,
) -> JsonValue {
    match value {
        JsonValue::String(s) => {
            if Alias::is_alias_str(s) {
                let mut chain = Vec::new();
                match resolve_alias(s, mode, tokens, &mut chain) {
                    Ok(terminal_json_id) => {
                        let terminal_id = pointer::dotted_from_json_id(&terminal_json_id);
                        let terminal = tokens.get(&terminal_id);
                        let terminal_type = terminal.and_then(|t| t.type_.clone());

                        let type_ok = expected_types.is_empty()
                            || terminal_type
                                .as_deref()
                                .is_some_and(|t| expected_types.iter().any(|e| e == t));

                        if !type_ok {
                            logger.error(Diagnostic::new(
                                DiagnosticKind::TypeMismatch {
                                    expected: expected_types.to_vec(),
                                    found: terminal_type.unwrap_or_default(),
                                },
                                filename,
                                Some(path.join("/")),
                            ));
                            site_refs.insert(
                                path.join("/"),
                                SiteRef {
                                    filename: filename.to_owned(),
                                    ref_chain: chain,
                                },
                            );
                            return value.clone();
                        }

                        site_refs.insert(
                            path.join("/"),
                            SiteRef {
                                filename: filename.to_owned(),
                                ref_chain: chain,
                            },
                        );

                        terminal
                            .and_then(|t| t.mode.get(mode).or_else(|| t.mode.get(".")))
                            .map(|state| state.value.clone())
                            .unwrap_or(JsonValue::Null)
                    }
                    Err(AliasFailure::Unresolved(target)) => {
                        logger.error(Diagnostic::new(
                            DiagnosticKind::UnresolvedAlias { target },
                            filename,
                            Some(path.join("/")),
                        ));
                        value.clone()
                    }
                    Err(AliasFailure::Circular(ref_chain)) => {
                        logger.error(Diagnostic::new(
                            DiagnosticKind::CircularAlias { ref_chain },
                            filename,
                            Some(path.join("/")),
                        ));
                        value.clone()
                    }
                }
            } else if !expected_types.is_empty() && (s.contains('{') || s.contains('}')) {
                logger.error(Diagnostic::new(
                    DiagnosticKind::InvalidAliasSyntax,
                    filename,
                    Some(path.join("/")),
                ));
                value.clone()
            } else {
                value.clone()
            }
        }
        JsonValue::Array(items) => {
            let element_expected: Vec<String> = if expected_types.iter().any(|e| e == "cubicBezier") {
                vec!["number".to_owned()]
            } else {
                Vec::new()
            };
            let resolved = items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    let mut child_path = path.to_vec();
                    child_path.push(i.to_string());
                    resolve_value(item, &element_expected, &child_path, mode, filename, tokens, logger, site_refs)
                })
                .collect();
            JsonValue::Array(resolved)
        }
        JsonValue::Object(map) => {
            let slots = expected_types.first().and_then(|t| composite_slots(t));
            let mut out = HashMap::new();
            for (key, field_value) in map {
                let slot = slots.and_then(|slots| slots.iter().find(|(name, _)| *name == key));
                match slot {
                    Some((_, field_expected)) => {
                        let field_expected: Vec<String> = field_expected.iter().map(|s| (*s).to_owned()).collect();
                        let mut child_path = path.to_vec();
                        child_path.push(key.clone());
                        out.insert(
                            key.clone(),
                            resolve_value(field_value, &field_expected, &child_path, mode, filename, tokens, logger, site_refs),
                        );
                    }
                    None => {
                        out.insert(key.clone(), field_value.clone());
                    }
                }
            }
            JsonValue::Object(out)
        }
        other => other.clone(),
    }
}

/// Resolve every token's every mode, in `order` (the walker's insertion
/// order) with modes iterated `.`-first then ascending (guaranteed by
/// `BTreeMap<String, _>`'s own ordering). Mutates each mode's `$value` in
/// place and returns the accumulated [`ModeRefMap`] for the graph linker.
pub fn resolve(tokens: &mut HashMap<String, TokenNormalized>, order: &[String], logger: &dyn Logger) -> ModeRefMap {
    let mut mode_ref_map: ModeRefMap = BTreeMap::new();

    // Two passes: compute every resolved value against a read-only snapshot
    // first (resolveAlias may read any other token's originalValue), then
    // apply the results. This avoids needing simultaneous mutable-and-shared
    // access to `tokens` mid-traversal.
    let mut updates: Vec<(String, String, JsonValue)> = Vec::new();

    for token_id in order {
        let Some(token) = tokens.get(token_id) else { continue };
        let expected_types: Vec<String> = token.type_.clone().into_iter().collect();

        for mode in token.mode.keys() {
            let Some(state) = token.mode.get(mode) else { continue };
            let path = vec![token.json_id.clone(), "$value".to_owned()];
            let mut site_refs = BTreeMap::new();
            let resolved = resolve_value(
                &state.original_value,
                &expected_types,
                &path,
                mode,
                &token.source.filename,
                tokens,
                logger,
                &mut site_refs,
            );

            mode_ref_map
                .entry(mode.clone())
                .or_default()
                .extend(site_refs);

            updates.push((token_id.clone(), mode.clone(), resolved));
        }
    }

    for (token_id, mode, resolved) in updates {
        if let Some(token) = tokens.get_mut(&token_id) {
            if let Some(state) = token.mode.get_mut(&mode) {
                state.value = resolved;
            }
        }
    }

    // "At mode `.`, the token's root `$value` is set from `mode['.'].$value`."
    for token in tokens.values_mut() {
        if let Some(default_mode) = token.mode.get(".") {
            token.value = default_mode.value.clone();
        }
    }

    mode_ref_map
}
