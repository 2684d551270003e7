//! Fixed, in-process business configuration.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::entities::{Keyword, ServiceArea, TargetSite};
use crate::domain::repositories::BusinessConfigRepository;
use crate::error::AppError;

#[derive(Debug, Clone, Default)]
struct BusinessInputs {
    keywords: Vec<Keyword>,
    areas: Vec<ServiceArea>,
    target: Option<TargetSite>,
}

/// Configuration held in memory, for tests and offline runs.
///
/// Unknown businesses have no keywords, no areas and no active target.
#[derive(Debug, Clone, Default)]
pub struct StaticBusinessConfig {
    businesses: HashMap<String, BusinessInputs>,
}

impl StaticBusinessConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_business(
        mut self,
        business_id: impl Into<String>,
        keywords: impl IntoIterator<Item = Keyword>,
        areas: impl IntoIterator<Item = ServiceArea>,
        target: Option<TargetSite>,
    ) -> Self {
        self.businesses.insert(
            business_id.into(),
            BusinessInputs {
                keywords: keywords.into_iter().collect(),
                areas: areas.into_iter().collect(),
                target,
            },
        );
        self
    }

    fn inputs(&self, business_id: &str) -> BusinessInputs {
        self.businesses
            .get(business_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl BusinessConfigRepository for StaticBusinessConfig {
    async fn get_keywords(&self, business_id: &str) -> Result<Vec<Keyword>, AppError> {
        Ok(self.inputs(business_id).keywords)
    }

    async fn get_service_areas(&self, business_id: &str) -> Result<Vec<ServiceArea>, AppError> {
        Ok(self.inputs(business_id).areas)
    }

    async fn get_active_target(&self, business_id: &str) -> Result<Option<TargetSite>, AppError> {
        Ok(self.inputs(business_id).target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_known_and_unknown_business() {
        let config = StaticBusinessConfig::new().with_business(
            "acme",
            vec![Keyword::from("cbd")],
            vec![ServiceArea::new("Towson", "MD")],
            None,
        );

        assert_eq!(config.get_keywords("acme").await.unwrap().len(), 1);
        assert_eq!(config.get_service_areas("acme").await.unwrap().len(), 1);
        assert!(config.get_keywords("globex").await.unwrap().is_empty());
        assert!(config.get_active_target("acme").await.unwrap().is_none());
    }
}
