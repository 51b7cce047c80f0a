//! The "document model" the core consumes (spec §1: "assumed pre-parsed
//! into a navigable node tree with source-location metadata"). Parsing JSON
//! text into that tree is out of scope for the core's design, but a thin
//! convenience constructor is still useful for callers who only have a
//! string — it defers entirely to `tinyjson`, exactly as the teacher's
//! `builder.rs::open_file` did for its own JSON loading.

use tinyjson::JsonValue;

use crate::error::ParseError;

/// One input source: a file's identity plus its parsed root node.
///
/// `filename` is carried through to every [`crate::diagnostic::Diagnostic`]
/// raised while walking this document, matching the `{ filename, src,
/// document }` input-source abstraction from spec §6 (`src`, the raw text,
/// is not retained — diagnostics only need the filename and a pointer).
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub filename: String,
    pub root: JsonValue,
}

impl Document {
    /// Build a `Document` directly from an already-parsed root node, e.g.
    /// when the caller has its own JSON/YAML front end.
    #[must_use]
    pub fn new(filename: impl Into<String>, root: JsonValue) -> Self {
        Document {
            filename: filename.into(),
            root,
        }
    }

    /// Parse `src` as JSON and wrap the result as a `Document`. Fails with
    /// [`ParseError::Json`] on malformed JSON or [`ParseError::InvalidRoot`]
    /// if the root is not an object — both are structural failures per
    /// spec §7, fatal to this document but not to the rest of a
    /// multi-document [`crate::resolve`] call.
    pub fn parse(filename: impl Into<String>, src: &str) -> Result<Self, ParseError> {
        let root: JsonValue = src.parse()?;
        if !matches!(root, JsonValue::Object(_)) {
            return Err(ParseError::InvalidRoot);
        }
        Ok(Document::new(filename, root))
    }

    /// The root object's members, or `None` if `root` is not an object.
    #[must_use]
    pub fn root_object(&self) -> Option<&std::collections::HashMap<String, JsonValue>> {
        self.root.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn test_parse_valid_document() {
        let src = indoc! {r#"
            {
              "color": {
                "red": { "$value": "#ff0000", "$type": "color" }
              }
            }
        "#};

        let document = Document::parse("tokens.json", src).unwrap();
        assert_eq!(document.filename, "tokens.json");
        assert!(document.root_object().is_some());
    }

    #[test]
    fn test_parse_rejects_non_object_root() {
        let result = Document::parse("tokens.json", "[1, 2, 3]");
        assert_eq!(result, Err(ParseError::InvalidRoot));
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        let result = Document::parse("tokens.json", "{not json");
        assert!(matches!(result, Err(ParseError::Json(_))));
    }
}
