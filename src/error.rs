//! Application error type shared by every layer.
//!
//! Errors follow a small taxonomy: input problems ([`AppError::Validation`]),
//! missing configuration ([`AppError::Precondition`]), failing collaborators
//! ([`AppError::Upstream`]) and unparseable collaborator payloads
//! ([`AppError::PartialData`]). Each error may be tagged with the pipeline
//! [`Stage`] it came from so callers can tell generation, reconciliation and
//! submission failures apart.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use std::fmt;

use crate::domain::entities::{PatternError, TargetSiteError};

/// Pipeline stage an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Generation,
    Reconciliation,
    Submission,
    Listing,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Generation => "generation",
            Stage::Reconciliation => "reconciliation",
            Stage::Submission => "submission",
            Stage::Listing => "listing",
        };
        f.write_str(name)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serializable error description used in API responses.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Validation {
        message: String,
        details: Value,
        stage: Option<Stage>,
    },
    #[error("{message}")]
    Precondition {
        message: String,
        details: Value,
        stage: Option<Stage>,
    },
    #[error("{message}")]
    Upstream {
        message: String,
        details: Value,
        stage: Option<Stage>,
    },
    #[error("{message}")]
    PartialData {
        message: String,
        details: Value,
        stage: Option<Stage>,
    },
    #[error("{message}")]
    Conflict {
        message: String,
        details: Value,
        stage: Option<Stage>,
    },
}

impl AppError {
    pub fn validation(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
            stage: None,
        }
    }
    pub fn precondition(message: impl Into<String>, details: Value) -> Self {
        Self::Precondition {
            message: message.into(),
            details,
            stage: None,
        }
    }
    pub fn upstream(message: impl Into<String>, details: Value) -> Self {
        Self::Upstream {
            message: message.into(),
            details,
            stage: None,
        }
    }
    pub fn partial_data(message: impl Into<String>, details: Value) -> Self {
        Self::PartialData {
            message: message.into(),
            details,
            stage: None,
        }
    }
    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
            stage: None,
        }
    }

    /// Tags the error with the stage it came from.
    ///
    /// An already-tagged error keeps its original stage, so the innermost
    /// stage wins when errors bubble through nested operations.
    pub fn at_stage(mut self, new_stage: Stage) -> Self {
        let slot = match &mut self {
            Self::Validation { stage, .. }
            | Self::Precondition { stage, .. }
            | Self::Upstream { stage, .. }
            | Self::PartialData { stage, .. }
            | Self::Conflict { stage, .. } => stage,
        };
        if slot.is_none() {
            *slot = Some(new_stage);
        }
        self
    }

    /// Adds one field to the error details.
    ///
    /// Non-object details are kept under `cause`.
    pub fn with_detail(mut self, key: &str, value: Value) -> Self {
        let details = match &mut self {
            Self::Validation { details, .. }
            | Self::Precondition { details, .. }
            | Self::Upstream { details, .. }
            | Self::PartialData { details, .. }
            | Self::Conflict { details, .. } => details,
        };
        if !details.is_object() {
            let cause = details.take();
            *details = json!({ "cause": cause });
        }
        if let Value::Object(map) = details {
            map.insert(key.to_string(), value);
        }
        self
    }

    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Validation { stage, .. }
            | Self::Precondition { stage, .. }
            | Self::Upstream { stage, .. }
            | Self::PartialData { stage, .. }
            | Self::Conflict { stage, .. } => *stage,
        }
    }

    /// Stable machine-readable code for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation_error",
            Self::Precondition { .. } => "precondition_error",
            Self::Upstream { .. } => "upstream_error",
            Self::PartialData { .. } => "partial_data_error",
            Self::Conflict { .. } => "conflict",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Precondition { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Upstream { .. } | Self::PartialData { .. } => StatusCode::BAD_GATEWAY,
            Self::Conflict { .. } => StatusCode::CONFLICT,
        }
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        let (message, details) = match self {
            Self::Validation {
                message, details, ..
            }
            | Self::Precondition {
                message, details, ..
            }
            | Self::Upstream {
                message, details, ..
            }
            | Self::PartialData {
                message, details, ..
            }
            | Self::Conflict {
                message, details, ..
            } => (message.clone(), details.clone()),
        };

        ErrorInfo {
            code: self.code(),
            message,
            stage: self.stage(),
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        tracing::error!(error = %e, "Status store query failed");
        AppError::upstream("Status store error", json!({ "reason": e.to_string() }))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::validation("Invalid request", json!({ "fields": e.to_string() }))
    }
}

impl From<PatternError> for AppError {
    fn from(e: PatternError) -> Self {
        AppError::validation("Invalid path pattern", json!({ "reason": e.to_string() }))
    }
}

impl From<TargetSiteError> for AppError {
    fn from(e: TargetSiteError) -> Self {
        AppError::validation("Invalid target site", json!({ "reason": e.to_string() }))
    }
}
