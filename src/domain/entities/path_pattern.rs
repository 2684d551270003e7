//! URL path pattern with `{keyword}`, `{city}` and `{state}` placeholders.

use regex::{Captures, Regex};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Pattern used when none is configured.
pub const DEFAULT_PATTERN: &str = "/{keyword}/{city}-{state}";

static PLACEHOLDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}]*)\}").expect("placeholder regex is valid"));

/// Errors raised while parsing a path pattern.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("Path pattern must not be empty")]
    Empty,

    #[error("Unknown placeholder '{{{0}}}' in path pattern")]
    UnknownPlaceholder(String),
}

/// A validated path template.
///
/// Only the `{keyword}`, `{city}` and `{state}` placeholders are accepted.
/// A placeholder that appears more than once is substituted at every
/// occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern(String);

impl PathPattern {
    /// Parses and validates a pattern.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::Empty`] for blank input and
    /// [`PatternError::UnknownPlaceholder`] for any `{...}` token other than
    /// the three supported placeholders.
    pub fn parse(raw: &str) -> Result<Self, PatternError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PatternError::Empty);
        }

        for caps in PLACEHOLDER_REGEX.captures_iter(trimmed) {
            let name = &caps[1];
            if !matches!(name, "keyword" | "city" | "state") {
                return Err(PatternError::UnknownPlaceholder(name.to_string()));
            }
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Renders the pattern with already-slugged values.
    ///
    /// Substitution is a single pass over the template, so placeholder text
    /// inside a value is never expanded again.
    pub fn render(&self, keyword: &str, city: &str, state: &str) -> String {
        PLACEHOLDER_REGEX
            .replace_all(&self.0, |caps: &Captures| match &caps[1] {
                "keyword" => keyword.to_string(),
                "city" => city.to_string(),
                "state" => state.to_string(),
                _ => caps[0].to_string(),
            })
            .into_owned()
    }
}

impl Default for PathPattern {
    fn default() -> Self {
        Self(DEFAULT_PATTERN.to_string())
    }
}

impl FromStr for PathPattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
