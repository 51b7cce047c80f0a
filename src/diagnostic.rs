//! The diagnostic sink the core reports problems through (spec §6/§7). The
//! core never panics or returns an `Err` for a problem found *in a document*
//! — bad aliases, cycles, type mismatches — it reports a [`Diagnostic`] to a
//! [`Logger`] and keeps going, exactly as spec §7 requires ("all diagnostics
//! are reported ... Resolution continues for other tokens").
//!
//! Structural failures (a document whose root isn't an object, malformed
//! JSON) are a different matter — those come back as a `Result::Err` from
//! [`crate::document::Document::parse`], because they prevent that document
//! from being walked at all.

use std::{cell::RefCell, fmt};

/// The four diagnostic kinds named in spec §7. Each carries only the data
/// needed to explain itself; the owning token/group and source location
/// travel alongside it on [`Diagnostic`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A non-alias string contained `{` or `}` where an alias was expected.
    InvalidAliasSyntax,
    /// An alias's target token does not exist in the token set.
    UnresolvedAlias { target: String },
    /// An alias chain revisited a `$ref` already in progress.
    CircularAlias { ref_chain: Vec<String> },
    /// The terminal token's `$type` was not one of the expected types for
    /// the alias site.
    TypeMismatch {
        expected: Vec<String>,
        found: String,
    },
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::InvalidAliasSyntax => write!(f, "Invalid alias syntax."),
            DiagnosticKind::UnresolvedAlias { target } => {
                write!(f, "Could not resolve alias {{{target}}}.")
            }
            DiagnosticKind::CircularAlias { ref_chain } => {
                write!(f, "Circular alias detected: {}", ref_chain.join(" -> "))
            }
            DiagnosticKind::TypeMismatch { expected, found } => {
                let expected = expected
                    .iter()
                    .map(|t| format!("\"{t}\""))
                    .collect::<Vec<_>>()
                    .join(" or ");
                write!(f, "Cannot alias to $type \"{found}\" from $type {expected}.")
            }
        }
    }
}

/// A single reported problem, carrying the `{group, label}` the spec's
/// abstract logger interface requires plus enough source context to point a
/// user at the offending node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub group: &'static str,
    pub label: &'static str,
    pub kind: DiagnosticKind,
    /// The document this diagnostic originated in.
    pub filename: String,
    /// JSON-Pointer-style location of the offending node, when known.
    pub pointer: Option<String>,
}

impl Diagnostic {
    #[must_use]
    pub fn new(kind: DiagnosticKind, filename: impl Into<String>, pointer: Option<String>) -> Self {
        Diagnostic {
            group: "parser",
            label: "init",
            kind,
            filename: filename.into(),
            pointer,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.filename, self.kind)?;
        if let Some(pointer) = &self.pointer {
            write!(f, " (at {pointer})")?;
        }
        Ok(())
    }
}

/// The diagnostic sink capability, passed to every component that can fail
/// on malformed input (spec §9: "pass an abstract logger capability to
/// every component. The core never prints.").
pub trait Logger {
    fn error(&self, diagnostic: Diagnostic);
}

/// Accumulates diagnostics in memory. The default logger for [`crate::Config`]
/// and the logger every test in this crate exercises the pipeline through.
#[derive(Debug, Default)]
pub struct CollectingLogger {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl CollectingLogger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain and return every diagnostic reported so far.
    pub fn take(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow_mut().drain(..).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diagnostics.borrow().is_empty()
    }
}

impl Logger for CollectingLogger {
    fn error(&self, diagnostic: Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic);
    }
}

/// Emits diagnostics as `cargo:warning=` lines, the convention build-script
/// consumers of this crate already use for surfacing problems to `cargo
/// build` output.
#[derive(Debug, Default)]
pub struct CargoWarningLogger;

impl Logger for CargoWarningLogger {
    fn error(&self, diagnostic: Diagnostic) {
        println!("cargo:warning={diagnostic}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collecting_logger_accumulates() {
        let logger = CollectingLogger::new();
        assert!(logger.is_empty());

        logger.error(Diagnostic::new(
            DiagnosticKind::InvalidAliasSyntax,
            "tokens.json",
            Some("#/color/red/$value".to_owned()),
        ));

        let diagnostics = logger.take();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::InvalidAliasSyntax);
        assert!(logger.is_empty());
    }

    #[test]
    fn test_display_messages() {
        let kind = DiagnosticKind::UnresolvedAlias {
            target: "color.missing".to_owned(),
        };
        assert_eq!(kind.to_string(), "Could not resolve alias {color.missing}.");

        let kind = DiagnosticKind::TypeMismatch {
            expected: vec!["color".to_owned()],
            found: "dimension".to_owned(),
        };
        assert_eq!(
            kind.to_string(),
            "Cannot alias to $type \"dimension\" from $type \"color\"."
        );
    }
}
