//! Utility functions shared across layers.
//!
//! - [`slug`] - Slug normalization for URL path tokens

pub mod slug;
