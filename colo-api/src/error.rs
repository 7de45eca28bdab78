//! API error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use colo_backend::BackendError;

/// API errors
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Requête invalide : {0}")]
    BadRequest(String),

    #[error("Non autorisé : {0}")]
    Unauthorized(String),

    #[error("Introuvable : {0}")]
    NotFound(String),

    #[error("Conflit : {0}")]
    Conflict(String),

    #[error("Validation : {0}")]
    Validation(String),

    #[error("Erreur interne : {0}")]
    Internal(String),

    #[error("Erreur du service en amont : {0}")]
    Backend(#[from] BackendError),
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            ApiError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            ApiError::Validation(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR", msg.clone())
            }
            ApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg.clone())
            }
            ApiError::Backend(err) if err.is_no_rows() => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string())
            }
            ApiError::Backend(BackendError::Superseded) => (
                StatusCode::CONFLICT,
                "SUPERSEDED",
                "Requête remplacée par une plus récente".to_string(),
            ),
            ApiError::Backend(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "UPSTREAM_ERROR",
                format!("Erreur du service en amont : {}", err),
            ),
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;
