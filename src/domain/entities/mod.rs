//! Core domain entities of the URL catalog.
//!
//! Entities are plain data structures with small invariant-keeping helpers.
//!
//! # Entity Types
//!
//! - [`ServiceArea`] / [`Keyword`] - Inputs owned by business configuration
//! - [`PathPattern`] - Validated path template
//! - [`GeneratedUrl`] / [`UrlStatus`] - A tracked URL and its lifecycle state
//! - [`UrlSet`] / [`StoredUrlSet`] - All URLs of a business, with version token
//! - [`TargetSite`] - Destination site for content generation
//! - [`UrlBreakdown`] - Preview counters

pub mod breakdown;
pub mod generated_url;
pub mod path_pattern;
pub mod service_area;
pub mod target_site;
pub mod url_set;

pub use breakdown::UrlBreakdown;
pub use generated_url::{GeneratedUrl, UnknownStatus, UrlStatus};
pub use path_pattern::{DEFAULT_PATTERN, PathPattern, PatternError};
pub use service_area::{Keyword, ServiceArea};
pub use target_site::{TargetSite, TargetSiteError};
pub use url_set::{StatusCounts, StoredUrlSet, UrlSet};
