use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

use crate::repository::errors::RepositoryError;

#[derive(Debug, Error)]
pub enum UsecaseError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Validation(String),

    /// The record is in a state that forbids the operation (already deleted).
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Internal(String),
}

impl UsecaseError {
    pub fn status(&self) -> StatusCode {
        match self {
            UsecaseError::NotFound(_) => StatusCode::NOT_FOUND,
            UsecaseError::Forbidden(_) => StatusCode::FORBIDDEN,
            UsecaseError::Validation(_) | UsecaseError::Conflict(_) => StatusCode::BAD_REQUEST,
            UsecaseError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn reason(&self) -> &'static str {
        match self {
            UsecaseError::NotFound(_) => "not_found",
            UsecaseError::Forbidden(_) => "forbidden",
            UsecaseError::Validation(_) => "validation",
            UsecaseError::Conflict(_) => "conflict",
            UsecaseError::Internal(_) => "internal",
        }
    }
}

impl From<RepositoryError> for UsecaseError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => UsecaseError::NotFound("Record".to_string()),
            RepositoryError::Store(msg) => UsecaseError::Internal(msg),
            err @ RepositoryError::Decode(_) => UsecaseError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for UsecaseError {
    fn into_response(self) -> axum::response::Response {
        match &self {
            UsecaseError::Internal(_) => {
                tracing::error!(error = %self, "internal error");
            }
            UsecaseError::NotFound(_) => {
                tracing::warn!(error = %self, "resource not found");
            }
            UsecaseError::Forbidden(_) => {
                tracing::warn!(error = %self, "forbidden");
            }
            _ => {
                tracing::debug!(error = %self);
            }
        }
        metrics::counter!("comment_requests_rejected_total", "reason" => self.reason()).increment(1);

        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
