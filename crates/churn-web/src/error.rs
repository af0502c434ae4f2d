//! Web error types

use crate::models::ErrorResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use churn_core::CollectError;
use churn_model::InferenceError;
use thiserror::Error;

/// Message shown for inference failures; details go to the log only
pub const INFERENCE_FAILED: &str = "Prediction failed. Please contact the administrator.";

/// Request-level error
#[derive(Debug, Error)]
pub enum WebError {
    /// Submission could not be parsed
    #[error("malformed request: {0}")]
    BadRequest(String),
    /// Submission failed validation
    #[error(transparent)]
    Collect(#[from] CollectError),
    /// Model artifact did not load at startup
    #[error("{0}")]
    ModelUnavailable(String),
    /// Artifact rejected the row
    #[error("inference failed: {0}")]
    Inference(#[from] InferenceError),
}

impl WebError {
    /// HTTP status
    pub fn status(&self) -> StatusCode {
        match self {
            WebError::BadRequest(_) | WebError::Collect(_) => StatusCode::UNPROCESSABLE_ENTITY,
            WebError::ModelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            WebError::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            WebError::BadRequest(_) => "bad_request",
            WebError::Collect(_) => "invalid_input",
            WebError::ModelUnavailable(_) => "model_unavailable",
            WebError::Inference(_) => "inference_failed",
        }
    }

    /// Message safe to show users
    pub fn user_message(&self) -> String {
        match self {
            WebError::Inference(_) => INFERENCE_FAILED.into(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        if let WebError::Inference(e) = &self {
            tracing::error!("Inference failed: {}", e);
        }
        let body = ErrorResponse {
            code: self.code().into(),
            message: self.user_message(),
        };
        (self.status(), Json(body)).into_response()
    }
}
