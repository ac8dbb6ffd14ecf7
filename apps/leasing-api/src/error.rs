//! Error types for the leasing API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use contract_core::{ChainError, GenerationError, TemplateStoreError, ValidationIssue};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("category not found: {0}")]
    CategoryNotFound(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    TemplateStore(#[from] TemplateStoreError),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, issues): (StatusCode, String, Option<Vec<ValidationIssue>>) =
            match self {
                ApiError::CategoryNotFound(id) => (
                    StatusCode::NOT_FOUND,
                    format!("category not found: {}", id),
                    None,
                ),
                ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
                ApiError::TemplateStore(err) => {
                    let status = match &err {
                        TemplateStoreError::DuplicateCode(_) => StatusCode::CONFLICT,
                        TemplateStoreError::TemplateNotFound(_) => StatusCode::NOT_FOUND,
                    };
                    (status, err.to_string(), None)
                }
                ApiError::Chain(err) => {
                    let status = match &err {
                        ChainError::LineageNotFound(_)
                        | ChainError::DocumentNotFound(_)
                        | ChainError::VersionNotFound { .. } => StatusCode::NOT_FOUND,
                        ChainError::ConcurrentVersionConflict(_)
                        | ChainError::InvalidStatusTransition { .. } => StatusCode::CONFLICT,
                        ChainError::Storage(e) => {
                            tracing::error!("storage error: {}", e);
                            StatusCode::INTERNAL_SERVER_ERROR
                        }
                    };
                    (status, err.to_string(), None)
                }
                ApiError::Generation(err) => match err {
                    GenerationError::ValidationFailed(issues) => (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        "validation failed".to_string(),
                        Some(issues),
                    ),
                    GenerationError::TemplateNotFound(id) => (
                        StatusCode::NOT_FOUND,
                        format!("template not found: {}", id),
                        None,
                    ),
                    GenerationError::TemplateInactive(code) => (
                        StatusCode::CONFLICT,
                        format!("template is inactive: {}", code),
                        None,
                    ),
                    GenerationError::Chain(err) => {
                        return ApiError::Chain(err).into_response();
                    }
                },
            };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
            "issues": issues,
        }));

        (status, body).into_response()
    }
}
