//! HTTP client for the content-generation queue intake.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use super::envelope::{EnvelopeError, attr_bool, attr_string, reported_message, unwrap_body};
use crate::domain::repositories::{ContentQueue, QueueError, QueueReceipt, QueueRequest};

/// Posts batches to the queue endpoint.
///
/// Status mapping: 2xx accepted unless the body says otherwise, 429 rate
/// limited, 5xx server failure, any other 4xx a definitive rejection.
pub struct HttpContentQueue {
    client: Client,
    url: String,
}

impl HttpContentQueue {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl ContentQueue for HttpContentQueue {
    async fn enqueue(&self, request: &QueueRequest) -> Result<QueueReceipt, QueueError> {
        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    QueueError::Timeout
                } else {
                    QueueError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            if e.is_timeout() {
                QueueError::Timeout
            } else {
                QueueError::Network(e.to_string())
            }
        })?;

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(QueueError::RateLimited);
        }
        if status.is_server_error() {
            return Err(QueueError::Server {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            let reason = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|raw| match unwrap_body(raw) {
                    Ok(body) => reported_message(&body),
                    Err(EnvelopeError::Reported(message)) => Some(message),
                    Err(EnvelopeError::Status { message, .. }) => Some(message),
                    Err(EnvelopeError::Unparseable(_)) => None,
                })
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            return Err(QueueError::Rejected { reason });
        }

        interpret_accepted_body(&text)
    }
}

/// Reads the body of a 2xx answer.
///
/// Bodies that are empty or not JSON count as accepted without a batch id:
/// the HTTP status is the acceptance signal.
fn interpret_accepted_body(text: &str) -> Result<QueueReceipt, QueueError> {
    if text.trim().is_empty() {
        return Ok(QueueReceipt::default());
    }

    let raw: Value = match serde_json::from_str(text) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Queue accepted batch with a non-JSON body: {}", e);
            return Ok(QueueReceipt::default());
        }
    };

    let body = match unwrap_body(raw) {
        Ok(body) => body,
        Err(EnvelopeError::Status { status, .. }) if status == 429 => {
            return Err(QueueError::RateLimited);
        }
        Err(EnvelopeError::Status { status, .. }) if status >= 500 => {
            return Err(QueueError::Server { status });
        }
        Err(EnvelopeError::Status { message, .. }) | Err(EnvelopeError::Reported(message)) => {
            return Err(QueueError::Rejected { reason: message });
        }
        Err(EnvelopeError::Unparseable(e)) => {
            warn!("Queue accepted batch with an unreadable envelope: {}", e);
            return Ok(QueueReceipt::default());
        }
    };

    let refused = ["accepted", "success"]
        .iter()
        .any(|key| body.get(*key).and_then(attr_bool) == Some(false));
    if refused {
        return Err(QueueError::Rejected {
            reason: reported_message(&body).unwrap_or_else(|| "Batch not accepted".to_string()),
        });
    }

    let batch_id = ["batchId", "batch_id", "messageId"]
        .iter()
        .find_map(|key| body.get(*key).and_then(attr_string));
    debug!(batch_id = ?batch_id, "Queue accepted batch");

    Ok(QueueReceipt { batch_id })
}
