//! JSON-Pointer-style path bookkeeping shared by the group indexer, token
//! normalizer, resolver, and graph linker. Group/token identities are dotted
//! (`color.brand.100`); the wire-level form used for alias `$ref`s and
//! `groups`/`tokens` map keys is a JSON Pointer (`#/color/brand/100`), with
//! `~`/`/` escaped inside each segment the same way `crate::types::alias`
//! escapes them when encoding a `{a.b.c}` alias.

/// Escape a single path segment for use inside a JSON Pointer.
pub(crate) fn escape_segment(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '~' => out.push_str("~0"),
            '/' => out.push_str("~1"),
            _ => out.push(c),
        }
    }
    out
}

/// Inverse of [`escape_segment`].
pub(crate) fn unescape_segment(s: &str) -> String {
    s.replace("~1", "/").replace("~0", "~")
}

/// Join a traversal path into the `#/a/b/c` pointer form.
pub(crate) fn to_json_id(path: &[String]) -> String {
    let mut out = String::from("#");
    for segment in path {
        out.push('/');
        out.push_str(&escape_segment(segment));
    }
    out
}

/// Join a traversal path into the dotted `a.b.c` id form.
pub(crate) fn to_dotted(path: &[String]) -> String {
    path.join(".")
}

/// `true` iff `ancestor` is a proper prefix of `json_id` on a `/` boundary,
/// i.e. `ancestor` names a group strictly containing `json_id`.
pub(crate) fn is_proper_prefix(ancestor: &str, json_id: &str) -> bool {
    json_id != ancestor
        && json_id.starts_with(ancestor)
        && json_id.as_bytes().get(ancestor.len()) == Some(&b'/')
}

/// Convert a group/token `#/a/b` pointer back to its dotted `a.b` id.
pub(crate) fn dotted_from_json_id(json_id: &str) -> String {
    json_id
        .strip_prefix('#')
        .unwrap_or(json_id)
        .split('/')
        .filter(|s| !s.is_empty())
        .map(unescape_segment)
        .collect::<Vec<_>>()
        .join(".")
}

/// Inverse of a `$ref` (spec §6): strip the leading `#/`, drop a trailing
/// `$value` member (and anything after it), unescape each segment, and join
/// with `.`. Returns `None` for refs that don't start with `#/`.
pub(crate) fn token_id_from_ref(r: &str) -> Option<String> {
    let rest = r.strip_prefix("#/")?;
    let mut segments: Vec<&str> = if rest.is_empty() {
        vec![]
    } else {
        rest.split('/').collect()
    };
    if let Some(pos) = segments.iter().position(|s| *s == "$value") {
        segments.truncate(pos);
    }
    if segments.is_empty() {
        return None;
    }
    Some(
        segments
            .iter()
            .map(|s| unescape_segment(s))
            .collect::<Vec<_>>()
            .join("."),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_json_id() {
        let path = vec!["color".to_owned(), "brand".to_owned(), "100".to_owned()];
        assert_eq!(to_json_id(&path), "#/color/brand/100");
        assert_eq!(to_json_id(&[]), "#");
    }

    #[test]
    fn test_is_proper_prefix() {
        assert!(is_proper_prefix("#", "#/color"));
        assert!(is_proper_prefix("#/color", "#/color/brand"));
        assert!(!is_proper_prefix("#/color", "#/color"));
        assert!(!is_proper_prefix("#/color", "#/colorful"));
        assert!(!is_proper_prefix("#/color/brand", "#/color"));
    }

    #[test]
    fn test_token_id_from_ref() {
        assert_eq!(
            token_id_from_ref("#/color/brand/100/$value"),
            Some("color.brand.100".to_owned())
        );
        assert_eq!(
            token_id_from_ref("#/color/focusring"),
            Some("color.focusring".to_owned())
        );
        assert_eq!(
            token_id_from_ref("#/a~1b/$value"),
            Some("a/b".to_owned())
        );
        assert_eq!(token_id_from_ref("not-a-ref"), None);
    }
}
