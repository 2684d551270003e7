//! DTOs for batch submission.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Selection of URL ids to send to the content queue.
///
/// An empty `ids` list is rejected by the catalog service, which tags the
/// error with the submission stage.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitRequest {
    #[validate(length(max = 10000, message = "At most 10000 ids per batch"))]
    pub ids: Vec<String>,

    /// Overrides the business's active website, e.g. `https://shop.example.com`.
    #[validate(length(min = 1, max = 2048))]
    pub target_site: Option<String>,
}

/// Accepted batch.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub business_id: String,
    pub accepted_count: usize,
    pub batch_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_site_is_optional() {
        let request: SubmitRequest = serde_json::from_str(r#"{"ids":["towson-cbd"]}"#).unwrap();
        assert!(request.validate().is_ok());
        assert!(request.target_site.is_none());
    }

    #[test]
    fn test_blank_target_site_is_invalid() {
        let request: SubmitRequest =
            serde_json::from_str(r#"{"ids":["towson-cbd"],"target_site":""}"#).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_oversized_selection_is_invalid() {
        let request = SubmitRequest {
            ids: vec!["x".to_string(); 10001],
            target_site: None,
        };
        assert!(request.validate().is_err());
    }
}
