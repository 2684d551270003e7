//! Service area and keyword value types supplied by business configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::utils::slug::slugify;

/// A city/state pair a business serves.
///
/// Equality and hashing are case-insensitive on both fields, so
/// `Towson, MD` and `towson, md` are the same area.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceArea {
    pub city: String,
    pub state: String,
}

impl ServiceArea {
    /// Creates a new service area.
    pub fn new(city: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            state: state.into(),
        }
    }

    pub fn city_slug(&self) -> String {
        slugify(&self.city)
    }

    pub fn state_slug(&self) -> String {
        slugify(&self.state)
    }

    /// Returns true if either field normalizes to an empty slug.
    pub fn is_blank(&self) -> bool {
        self.city_slug().is_empty() || self.state_slug().is_empty()
    }

    fn folded(&self) -> (String, String) {
        (self.city.to_lowercase(), self.state.to_lowercase())
    }
}

impl PartialEq for ServiceArea {
    fn eq(&self, other: &Self) -> bool {
        self.folded() == other.folded()
    }
}

impl Eq for ServiceArea {}

impl Hash for ServiceArea {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.folded().hash(state);
    }
}

impl fmt::Display for ServiceArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.city, self.state)
    }
}

/// A keyword token configured for a business.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Keyword(String);

impl Keyword {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn slug(&self) -> String {
        slugify(&self.0)
    }
}

impl From<&str> for Keyword {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Keyword {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
