//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for persistence, upstream HTTP services and
//! caching.
//!
//! # Modules
//!
//! - [`cache`] - Preview cache (Redis and no-op implementations)
//! - [`http`] - Configuration service and content queue clients
//! - [`persistence`] - Status store implementations
//! - [`static_config`] - In-memory business configuration

pub mod cache;
pub mod http;
pub mod persistence;
pub mod static_config;
