//! Read-only access to a business's generation inputs.

use crate::domain::entities::{Keyword, ServiceArea, TargetSite};
use crate::error::AppError;
use async_trait::async_trait;

/// Keywords, service areas and active website of a business.
///
/// Owned by the business configuration service; this crate never writes it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BusinessConfigRepository: Send + Sync {
    /// Returns configured keywords in their configured order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Upstream`] if the service is unreachable or fails,
    /// [`AppError::PartialData`] if the response cannot be parsed.
    async fn get_keywords(&self, business_id: &str) -> Result<Vec<Keyword>, AppError>;

    /// Returns configured service areas in their configured order.
    ///
    /// # Errors
    ///
    /// Same as [`Self::get_keywords`].
    async fn get_service_areas(&self, business_id: &str) -> Result<Vec<ServiceArea>, AppError>;

    /// Returns the website content is currently generated for, if any.
    ///
    /// # Errors
    ///
    /// Same as [`Self::get_keywords`].
    async fn get_active_target(&self, business_id: &str) -> Result<Option<TargetSite>, AppError>;
}
