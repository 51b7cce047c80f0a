//! Normalization and alias resolution for Design Tokens (DTCG) documents.
//!
//! This crate takes one or more parsed [Design Tokens] documents — a
//! hierarchical tree of *groups* and *tokens* — and produces a flat,
//! normalized token set in which every `{group.token}` alias has been
//! resolved to a concrete value, alongside a bidirectional alias graph
//! (`aliasOf`, `aliasChain`, `aliasedBy`, `dependencies`, `partialAliasOf`).
//!
//! # Usage
//!
//! ```no_run
//! use dtoken::{config::Config, document::Document};
//!
//! let document = Document::parse("design_tokens.json", r#"{
//!   "color": {
//!     "red": { "$value": "#ff0000", "$type": "color" },
//!     "danger": { "$value": "{color.red}" }
//!   }
//! }"#).unwrap();
//!
//! let config = Config::builder().source(document).build().unwrap();
//! let resolved = dtoken::resolve(config);
//!
//! assert_eq!(resolved.tokens["color.danger"].alias_of.as_deref(), Some("color.red"));
//! ```
//!
//! What this crate deliberately does *not* do: parse JSON/YAML text into a
//! document tree beyond the thin [`document::Document::parse`] convenience
//! (bring your own front end for other formats), merge multiple documents'
//! conflicting definitions, or emit CSS/Sass/platform-specific output. Those
//! are downstream concerns layered on top of the flat token set this crate
//! produces.
//!
//! [Design Tokens]: https://tr.designtokens.org

pub mod config;
pub mod diagnostic;
pub mod document;
pub mod error;
pub mod graph;
pub mod group;
pub(crate) mod pointer;
pub mod resolver;
pub mod token;
pub mod types;
pub mod walker;

use std::collections::HashMap;

use config::Config;
use token::TokenNormalized;

/// The full output of a [`resolve`] run: every surviving token, keyed by
/// its dotted id, and every group discovered across all of `config`'s
/// sources.
pub struct Resolved {
    pub tokens: HashMap<String, TokenNormalized>,
    pub groups: group::GroupIndex,
}

/// Run the three-phase pipeline (spec §2/§5) over every document in
/// `config.sources`, in order: walk each document (building the group index
/// and the flat, not-yet-resolved token set), resolve every token's every
/// mode (substituting aliases and recording reference sites), then link the
/// alias graph (`aliasOf`/`aliasChain`/`aliasedBy`/`dependencies`/
/// `partialAliasOf`) from the recorded references.
///
/// Multiple documents contribute to one shared token/group space; this
/// crate does not arbitrate conflicting definitions across documents (see
/// the crate docs) — a later document's token simply overwrites an earlier
/// one with the same id.
#[must_use]
pub fn resolve(config: Config) -> Resolved {
    let mut groups = group::GroupIndex::new();
    let mut tokens = HashMap::new();
    let mut order = Vec::new();

    for document in &config.sources {
        let result = walker::walk(document, &config.ignore);
        groups.merge(result.groups);
        order.extend(result.order);
        tokens.extend(result.tokens);
    }

    let mode_ref_map = resolver::resolve(&mut tokens, &order, config.logger.as_ref());
    graph::link(&mut tokens, &mode_ref_map);

    tracing::info!(
        tokens = tokens.len(),
        groups = groups.iter().count(),
        "resolved design tokens"
    );

    Resolved { tokens, groups }
}
