//! Destination website content is generated for.

use serde::Serialize;
use std::fmt;
use url::Url;

/// Errors that can occur while parsing a target site.
#[derive(Debug, thiserror::Error)]
pub enum TargetSiteError {
    #[error("Target site must not be empty")]
    Empty,

    #[error("Invalid target site '{0}'")]
    Invalid(String),
}

/// The website a submission batch is generated for.
///
/// Stored without scheme as `host[/path]`, lowercase host, no trailing slash,
/// which is the form the content queue expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetSite {
    site: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl TargetSite {
    /// Parses a site given as a bare host or a full HTTP(S) URL.
    ///
    /// # Examples
    ///
    /// ```
    /// use seo_urlgen::domain::entities::TargetSite;
    ///
    /// let site = TargetSite::parse("https://WWW.Example.com/").unwrap();
    /// assert_eq!(site.as_str(), "www.example.com");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`TargetSiteError::Empty`] for blank input and
    /// [`TargetSiteError::Invalid`] when no host can be extracted.
    pub fn parse(raw: &str) -> Result<Self, TargetSiteError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TargetSiteError::Empty);
        }

        let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            trimmed.to_string()
        } else {
            format!("https://{trimmed}")
        };

        let url =
            Url::parse(&with_scheme).map_err(|_| TargetSiteError::Invalid(trimmed.to_string()))?;
        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| TargetSiteError::Invalid(trimmed.to_string()))?
            .to_ascii_lowercase();

        let path = url.path().trim_end_matches('/');
        let site = match url.port() {
            Some(port) => format!("{host}:{port}{path}"),
            None => format!("{host}{path}"),
        };

        Ok(Self { site, name: None })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn as_str(&self) -> &str {
        &self.site
    }
}

impl fmt::Display for TargetSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.site)
    }
}
