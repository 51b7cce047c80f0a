//! Errors returned while normalizing and resolving Design Tokens documents.

use std::{
    error::Error as StdError,
    fmt::{self, Display},
};

/// Error returned while parsing a single token value (a `$value`, or one of its
/// composite sub-fields) into a typed representation.
///
/// This is the value-level error used throughout `crate::types`. It does not
/// carry the group/token identifying context — callers attach that with
/// [`Error::prop`] as the error bubbles up through nested composite fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A required property is missing.
    MustExist,
    /// A JSON-equivalent value was not a string where one was required.
    ExpectedString,
    /// A JSON-equivalent value was not a number where one was required.
    ExpectedNumber,
    /// A JSON-equivalent value was not a boolean where one was required.
    ExpectedBool,
    /// A JSON-equivalent value was not an array where one was required.
    ExpectedArray,
    /// A JSON-equivalent value was not an object where one was required.
    ExpectedObject,
    /// An array element was not a string where one was required.
    ExpectedItemString,
    /// An array element was not an object where one was required.
    ExpectedItemObject,
    /// An array element was not a number where one was required.
    ExpectedItemNumber,
    /// A value's JSON type has no valid interpretation for the expected `$type`.
    UnexpectedType,
    /// An array or other collection was empty where at least one item is required.
    CollectionEmpty,
    /// A string was not in the expected shape, with a human-readable explanation.
    InvalidFormat(&'static str),
    /// A string-encoded value had a unit outside the ones listed.
    InvalidUnit(&'static [&'static str]),
    /// A numeric value fell outside the inclusive range `[lo, hi]`.
    NumberWithin(i32, i32),
    /// An alias string (`{a.b.c}`) was missing its opening or closing brace.
    MissingToken(char),
    /// An error that occurred while parsing a named property, wrapping the
    /// underlying cause.
    Property {
        name: &'static str,
        source: Box<Error>,
    },
}

impl Error {
    /// Wrap `source` as having occurred while parsing the property named `name`.
    #[must_use]
    pub fn prop(name: &'static str, source: Error) -> Self {
        Error::Property {
            name,
            source: Box::new(source),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Property { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MustExist => write!(f, "property must be present"),
            Error::ExpectedString => write!(f, "expected a string value"),
            Error::ExpectedNumber => write!(f, "expected a number value"),
            Error::ExpectedBool => write!(f, "expected a boolean value"),
            Error::ExpectedArray => write!(f, "expected an array value"),
            Error::ExpectedObject => write!(f, "expected an object value"),
            Error::ExpectedItemString => write!(f, "expected every array item to be a string"),
            Error::ExpectedItemObject => write!(f, "expected every array item to be an object"),
            Error::ExpectedItemNumber => write!(f, "expected every array item to be a number"),
            Error::UnexpectedType => write!(f, "value has no valid interpretation for this type"),
            Error::CollectionEmpty => write!(f, "collection must not be empty"),
            Error::InvalidFormat(reason) => write!(f, "invalid format: {reason}"),
            Error::InvalidUnit(units) => write!(f, "expected one of the units {units:?}"),
            Error::NumberWithin(lo, hi) => write!(f, "expected a number within [{lo}, {hi}]"),
            Error::MissingToken(c) => write!(f, "alias is missing a `{c}`"),
            Error::Property { name, source } => write!(f, "`{name}`: {source}"),
        }
    }
}

/// Error returned when a [`crate::config::ConfigBuilder`] is missing required
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No document sources were registered.
    MissingSource,
    /// A glob pattern supplied to `ignore_tokens` failed to compile.
    InvalidPattern(String),
}

impl StdError for ConfigError {}

impl Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingSource => write!(f, "at least one document source is required"),
            ConfigError::InvalidPattern(pattern) => {
                write!(f, "`{pattern}` is not a valid glob pattern")
            }
        }
    }
}

/// Structural error that prevents a document from being walked at all.
///
/// These are fatal to the surrounding merge/parse step, not to the core: a
/// single malformed document aborts that document's contribution, but does
/// not prevent other documents in the same [`crate::resolve`] call from being
/// normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The document's root node is not a JSON object.
    InvalidRoot,
    /// The underlying JSON text failed to parse.
    Json(String),
}

impl StdError for ParseError {}

impl Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::InvalidRoot => write!(f, "document root must be a JSON object"),
            ParseError::Json(message) => write!(f, "failed to parse document: {message}"),
        }
    }
}

impl From<tinyjson::JsonParseError> for ParseError {
    fn from(source: tinyjson::JsonParseError) -> Self {
        ParseError::Json(source.to_string())
    }
}
