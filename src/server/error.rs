//! Error types for the server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::error::LoanError;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<LoanError> for ServerError {
    fn from(err: LoanError) -> Self {
        match err {
            LoanError::Validation(msg) | LoanError::Processing(msg) => ServerError::BadRequest(msg),
            LoanError::Unavailable(msg) => ServerError::Unavailable(msg),
            other => ServerError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ServerError::Unavailable(msg) => {
                tracing::warn!(detail = %msg, "Request rejected, model not loaded");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Model not loaded. Train the model and restart the service.".to_string(),
                )
            }
            ServerError::Internal(msg) => {
                tracing::error!(detail = %msg, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "An internal error occurred".to_string())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
