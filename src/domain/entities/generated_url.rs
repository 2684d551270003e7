//! Generated URL entity and its lifecycle status.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a generated URL.
///
/// - `Generated` - candidate exists, not yet submitted
/// - `Pending` - accepted by the content queue, awaiting completion
/// - `Error` - submission or external generation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlStatus {
    Generated,
    Pending,
    Error,
}

impl UrlStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UrlStatus::Generated => "generated",
            UrlStatus::Pending => "pending",
            UrlStatus::Error => "error",
        }
    }
}

impl fmt::Display for UrlStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a stored or requested status string is not recognized.
#[derive(Debug, thiserror::Error)]
#[error("unknown URL status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for UrlStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "generated" => Ok(UrlStatus::Generated),
            "pending" => Ok(UrlStatus::Pending),
            "error" => Ok(UrlStatus::Error),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// A single location/keyword page URL tracked for a business.
///
/// `id` is the stable fingerprint used for reconciliation; `path` is the
/// rendered pattern. `batch_id` is set while the URL is `Pending` and names
/// the queue batch it was submitted in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedUrl {
    pub id: String,
    pub path: String,
    pub status: UrlStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<String>,
}

impl GeneratedUrl {
    /// Creates a fresh candidate in the `Generated` state.
    pub fn candidate(id: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            status: UrlStatus::Generated,
            error: None,
            batch_id: None,
        }
    }

    pub fn mark_pending(&mut self, batch_id: &str) {
        self.status = UrlStatus::Pending;
        self.error = None;
        self.batch_id = Some(batch_id.to_string());
    }

    pub fn mark_error(&mut self, reason: impl Into<String>) {
        self.status = UrlStatus::Error;
        self.error = Some(reason.into());
    }

    /// URLs already waiting on the queue cannot be submitted again.
    pub fn is_submittable(&self) -> bool {
        self.status != UrlStatus::Pending
    }
}
