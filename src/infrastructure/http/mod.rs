//! HTTP clients for upstream services.
//!
//! - [`HttpBusinessConfig`] - Business configuration service
//! - [`HttpContentQueue`] - Content-generation queue intake
//!
//! Both share the lenient response decoding in [`envelope`].

pub mod business_config_client;
pub mod content_queue_client;
pub mod envelope;

pub use business_config_client::HttpBusinessConfig;
pub use content_queue_client::HttpContentQueue;
