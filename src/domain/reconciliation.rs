//! Merging freshly generated candidates into a persisted URL set.
//!
//! Reconciliation is append-only: existing entries are never modified,
//! reordered or removed, even when their keyword or area was dropped from
//! configuration. Running it twice with the same candidates is a no-op the
//! second time.

use std::collections::HashSet;

use serde::Serialize;

use crate::domain::entities::{GeneratedUrl, UrlSet, UrlStatus};

/// Counters describing one reconciliation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileSummary {
    /// Candidates that were not stored before and got appended.
    pub added: usize,
    /// Stored entries that were also produced by this run.
    pub retained: usize,
    /// Stored entries no longer produced by the current configuration.
    pub stale: usize,
}

/// Returns `existing` with every unseen candidate appended in candidate order.
///
/// Candidates repeating an id (already stored or earlier in `candidates`)
/// are dropped.
pub fn reconcile(existing: &UrlSet, candidates: &[GeneratedUrl]) -> UrlSet {
    reconcile_with_summary(existing, candidates).0
}

/// Same as [`reconcile`], also reporting what changed.
pub fn reconcile_with_summary(
    existing: &UrlSet,
    candidates: &[GeneratedUrl],
) -> (UrlSet, ReconcileSummary) {
    let stored: HashSet<&str> = existing.iter().map(|entry| entry.id.as_str()).collect();
    let mut seen: HashSet<&str> = HashSet::with_capacity(candidates.len());
    let mut merged = existing.clone();
    let mut summary = ReconcileSummary::default();

    for candidate in candidates {
        if !seen.insert(candidate.id.as_str()) {
            continue;
        }
        if stored.contains(candidate.id.as_str()) {
            summary.retained += 1;
        } else {
            merged.push_unchecked(candidate.clone());
            summary.added += 1;
        }
    }

    summary.stale = stored.len() - summary.retained;
    (merged, summary)
}

/// Result of applying failures reported by the content worker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FailureOutcome {
    /// Ids moved from `Pending` to `Error`.
    pub applied: Vec<String>,
    /// Ids that exist but were not pending; left untouched.
    pub skipped: Vec<String>,
    /// Ids that are not part of the set.
    pub unknown: Vec<String>,
}

/// Marks pending URLs as failed with the worker supplied reason.
///
/// Only `Pending` entries change. Everything else is reported back so the
/// caller can decide how to surface it.
pub fn apply_worker_failures(
    set: &UrlSet,
    failures: &[(String, String)],
) -> (UrlSet, FailureOutcome) {
    let mut updated = set.clone();
    let mut outcome = FailureOutcome::default();

    for (id, reason) in failures {
        match updated.get_mut(id) {
            Some(entry) if entry.status == UrlStatus::Pending => {
                entry.mark_error(reason.clone());
                outcome.applied.push(id.clone());
            }
            Some(_) => outcome.skipped.push(id.clone()),
            None => outcome.unknown.push(id.clone()),
        }
    }

    (updated, outcome)
}
