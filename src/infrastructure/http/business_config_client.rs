//! HTTP client for the business configuration service.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::envelope::{EnvelopeError, attr_list, attr_map, attr_string, unwrap_body};
use crate::domain::entities::{Keyword, ServiceArea, TargetSite};
use crate::domain::repositories::BusinessConfigRepository;
use crate::error::AppError;

const KEYWORDS_ENDPOINT: &str = "get-seo-keywords";
const SERVICE_AREAS_ENDPOINT: &str = "get-service-areas";
const ACTIVE_WEBSITE_ENDPOINT: &str = "get-active-website";

/// Reads keywords, service areas and the active website over HTTP.
///
/// Every endpoint is a `POST {base_url}/<endpoint>` with body
/// `{"business-slug": <id>}`. A `BUS#` prefix on the business id is
/// stripped before sending.
pub struct HttpBusinessConfig {
    client: Client,
    base_url: String,
}

impl HttpBusinessConfig {
    /// Creates a client; `client` should already carry the upstream timeout.
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn call(&self, endpoint: &'static str, business_id: &str) -> Result<Value, AppError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self
            .client
            .post(&url)
            .json(&json!({ "business-slug": business_slug(business_id) }))
            .send()
            .await
            .map_err(|e| {
                AppError::upstream(
                    "Configuration service unreachable",
                    json!({ "endpoint": endpoint, "reason": e.to_string(), "timeout": e.is_timeout() }),
                )
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            AppError::upstream(
                "Configuration service response could not be read",
                json!({ "endpoint": endpoint, "reason": e.to_string() }),
            )
        })?;

        if !status.is_success() {
            return Err(AppError::upstream(
                "Configuration service request failed",
                json!({ "endpoint": endpoint, "status": status.as_u16() }),
            ));
        }

        if text.trim().is_empty() {
            debug!(endpoint, business_id, "Empty configuration response");
            return Ok(json!({}));
        }

        let raw: Value = serde_json::from_str(&text).map_err(|e| {
            AppError::partial_data(
                "Configuration service returned unparseable data",
                json!({ "endpoint": endpoint, "reason": e.to_string() }),
            )
        })?;

        unwrap_body(raw).map_err(|e| envelope_error(endpoint, e))
    }
}

#[async_trait]
impl BusinessConfigRepository for HttpBusinessConfig {
    async fn get_keywords(&self, business_id: &str) -> Result<Vec<Keyword>, AppError> {
        let body = self.call(KEYWORDS_ENDPOINT, business_id).await?;
        Ok(parse_keywords(&body))
    }

    async fn get_service_areas(&self, business_id: &str) -> Result<Vec<ServiceArea>, AppError> {
        let body = self.call(SERVICE_AREAS_ENDPOINT, business_id).await?;
        Ok(parse_service_areas(&body))
    }

    async fn get_active_target(&self, business_id: &str) -> Result<Option<TargetSite>, AppError> {
        let body = self.call(ACTIVE_WEBSITE_ENDPOINT, business_id).await?;
        parse_active_website(&body)
    }
}

/// Identifier the configuration service expects.
pub fn business_slug(business_id: &str) -> &str {
    business_id.strip_prefix("BUS#").unwrap_or(business_id)
}

fn envelope_error(endpoint: &'static str, e: EnvelopeError) -> AppError {
    match e {
        EnvelopeError::Unparseable(reason) => AppError::partial_data(
            "Configuration service returned unparseable data",
            json!({ "endpoint": endpoint, "reason": reason }),
        ),
        EnvelopeError::Status { status, message } => AppError::upstream(
            "Configuration service request failed",
            json!({ "endpoint": endpoint, "status": status, "reason": message }),
        ),
        EnvelopeError::Reported(message) => AppError::upstream(
            "Configuration service reported an error",
            json!({ "endpoint": endpoint, "reason": message }),
        ),
    }
}

fn parse_keywords(body: &Value) -> Vec<Keyword> {
    let Some(items) = body.get("keywords").and_then(attr_list) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(attr_string)
        .map(Keyword::new)
        .collect()
}

fn parse_service_areas(body: &Value) -> Vec<ServiceArea> {
    let Some(items) = body.get("serviceAreas").and_then(attr_list) else {
        return Vec::new();
    };

    let areas: Vec<ServiceArea> = items
        .iter()
        .filter_map(|item| {
            let fields = attr_map(item)?;
            let city = fields.get("city").and_then(attr_string)?;
            let state = fields.get("state").and_then(attr_string)?;
            Some(ServiceArea::new(city, state))
        })
        .collect();

    if areas.len() < items.len() {
        warn!(
            skipped = items.len() - areas.len(),
            "Skipping service areas without city or state"
        );
    }

    areas
}

fn parse_active_website(body: &Value) -> Result<Option<TargetSite>, AppError> {
    let Some(website) = body.get("activeWebsite").and_then(attr_map) else {
        return Ok(None);
    };
    let Some(url) = website.get("url").and_then(attr_string) else {
        return Ok(None);
    };

    let site = TargetSite::parse(&url).map_err(|e| {
        AppError::precondition(
            "Active website has an invalid URL",
            json!({ "url": url, "reason": e.to_string() }),
        )
    })?;

    Ok(Some(match website.get("name").and_then(attr_string) {
        Some(name) => site.with_name(name),
        None => site,
    }))
}
