//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod health;
pub mod submissions;
pub mod urls;
pub mod worker_failures;

pub use health::health_handler;
pub use submissions::submit_handler;
pub use urls::{generate_handler, list_urls_handler, preview_handler, progress_handler};
pub use worker_failures::worker_failures_handler;
