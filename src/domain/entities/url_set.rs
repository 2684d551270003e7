//! Ordered set of generated URLs persisted per business.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::generated_url::{GeneratedUrl, UrlStatus};

/// All known URLs of one business, in persisted order.
///
/// Ids are unique: constructing a set from entries that repeat an id keeps
/// the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UrlSet {
    entries: Vec<GeneratedUrl>,
}

impl UrlSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from entries, dropping repeated ids (first wins).
    pub fn from_entries(entries: impl IntoIterator<Item = GeneratedUrl>) -> Self {
        let mut seen = HashSet::new();
        let entries = entries
            .into_iter()
            .filter(|entry| seen.insert(entry.id.clone()))
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[GeneratedUrl] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<GeneratedUrl> {
        self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &GeneratedUrl> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&GeneratedUrl> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut GeneratedUrl> {
        self.entries.iter_mut().find(|entry| entry.id == id)
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut GeneratedUrl> {
        self.entries.iter_mut()
    }

    /// Appends an entry without checking for an existing id.
    ///
    /// Callers must guarantee the id is not present yet.
    pub(crate) fn push_unchecked(&mut self, entry: GeneratedUrl) {
        self.entries.push(entry);
    }

    pub fn with_status(&self, status: UrlStatus) -> impl Iterator<Item = &GeneratedUrl> {
        self.entries.iter().filter(move |entry| entry.status == status)
    }

    pub fn status_counts(&self) -> StatusCounts {
        let mut counts = StatusCounts {
            total: self.entries.len(),
            ..StatusCounts::default()
        };
        for entry in &self.entries {
            match entry.status {
                UrlStatus::Generated => counts.generated += 1,
                UrlStatus::Pending => counts.pending += 1,
                UrlStatus::Error => counts.error += 1,
            }
        }
        counts
    }
}

/// Per-status totals for progress reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub total: usize,
    pub generated: usize,
    pub pending: usize,
    pub error: usize,
}

/// A URL set together with the version token it was loaded at.
///
/// `version` is 0 for a business that has never been saved. Saving requires
/// the version read at load time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredUrlSet {
    pub urls: UrlSet,
    pub version: i64,
    pub updated_at: Option<DateTime<Utc>>,
}

impl StoredUrlSet {
    pub fn empty() -> Self {
        Self::default()
    }
}
