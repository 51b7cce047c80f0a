//! Configuration surface for a [`crate::resolve`] run: which documents to
//! pull tokens from, which tokens to drop, and where diagnostics go.
//!
//! Generalizes the teacher's `DesignTokensBuilder` (`.source(...)`,
//! `.name(...)`, `.output(...)`) into a `Config`/`ConfigBuilder` pair built
//! the same fluent way, but driving normalization instead of Rust code
//! generation.

use crate::{
    diagnostic::{CollectingLogger, Logger},
    document::Document,
    error::ConfigError,
};

/// Token-dropping rules applied at the end of token assembly (spec §4.C
/// step 7, §9 Open Question 3: "ignore filters run after mode extraction").
pub struct Ignore {
    pub deprecated: bool,
    patterns: Vec<glob::Pattern>,
}

impl Ignore {
    #[must_use]
    pub fn matches(&self, id: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.matches(id))
    }

    #[cfg(test)]
    pub(crate) fn for_test(deprecated: bool, patterns: Vec<glob::Pattern>) -> Self {
        Ignore { deprecated, patterns }
    }
}

/// A fully built configuration: document sources, ignore rules, and the
/// diagnostic sink they're all reported through.
pub struct Config {
    pub sources: Vec<Document>,
    pub ignore: Ignore,
    pub logger: Box<dyn Logger>,
}

impl Config {
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

/// Fluent builder for [`Config`]. Mirrors the teacher's
/// `DesignTokensBuilder`: each setter takes and returns `self` by value so
/// calls chain, and `.build()` is where misconfiguration becomes a
/// reported [`ConfigError`].
#[derive(Default)]
pub struct ConfigBuilder {
    sources: Vec<Document>,
    ignore_deprecated: bool,
    ignore_tokens: Vec<String>,
    logger: Option<Box<dyn Logger>>,
}

impl ConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn source(mut self, document: Document) -> Self {
        self.sources.push(document);
        self
    }

    #[must_use]
    pub fn sources(mut self, documents: impl IntoIterator<Item = Document>) -> Self {
        self.sources.extend(documents);
        self
    }

    #[must_use]
    pub fn ignore_deprecated(mut self, ignore: bool) -> Self {
        self.ignore_deprecated = ignore;
        self
    }

    #[must_use]
    pub fn ignore_tokens(mut self, patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.ignore_tokens.extend(patterns.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn logger(mut self, logger: impl Logger + 'static) -> Self {
        self.logger = Some(Box::new(logger));
        self
    }

    /// Finalize the builder, compiling every `ignore_tokens` glob pattern
    /// and requiring at least one document source.
    pub fn build(self) -> Result<Config, ConfigError> {
        if self.sources.is_empty() {
            return Err(ConfigError::MissingSource);
        }

        let patterns = self
            .ignore_tokens
            .iter()
            .map(|pattern| {
                glob::Pattern::new(pattern)
                    .map_err(|_| ConfigError::InvalidPattern(pattern.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Config {
            sources: self.sources,
            ignore: Ignore {
                deprecated: self.ignore_deprecated,
                patterns,
            },
            logger: self.logger.unwrap_or_else(|| Box::new(CollectingLogger::new())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(filename: &str) -> Document {
        Document::parse(filename, "{}").unwrap()
    }

    #[test]
    fn test_build_requires_a_source() {
        let result = ConfigBuilder::new().build();
        assert!(matches!(result, Err(ConfigError::MissingSource)));
    }

    #[test]
    fn test_build_rejects_invalid_glob() {
        let result = ConfigBuilder::new()
            .source(doc("tokens.json"))
            .ignore_tokens(["color.[brand"])
            .build();
        assert!(matches!(result, Err(ConfigError::InvalidPattern(_))));
    }

    #[test]
    fn test_ignore_tokens_matches_glob() {
        let config = ConfigBuilder::new()
            .source(doc("tokens.json"))
            .ignore_tokens(["color.legacy.*"])
            .build()
            .unwrap();

        assert!(config.ignore.matches("color.legacy.red"));
        assert!(!config.ignore.matches("color.brand.red"));
    }

    #[test]
    fn test_ignore_deprecated_defaults_to_false() {
        let config = ConfigBuilder::new().source(doc("tokens.json")).build().unwrap();
        assert!(!config.ignore.deprecated);
    }
}
