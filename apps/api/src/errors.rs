use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::pipeline::engine::Stage;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Taxonomy rule: only `Validation`, `QuotaExceeded`/`RateLimited`, and
/// `GenerationStage` may fail an end-to-end generation request. `Evaluation`
/// and `Auxiliary` failures are recovered by the orchestrator before they
/// reach a handler.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Monthly quota exceeded: {used}/{limit}")]
    QuotaExceeded { used: u64, limit: u64 },

    #[error("Rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Generation stage {stage} failed: {message}")]
    GenerationStage { stage: Stage, message: String },

    #[error("Quality evaluation failed: {0}")]
    Evaluation(String),

    #[error("Auxiliary generator failed: {0}")]
    Auxiliary(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone(), None),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone(), None)
            }
            AppError::QuotaExceeded { used, limit } => (
                StatusCode::TOO_MANY_REQUESTS,
                "QUOTA_EXCEEDED",
                "Monthly proposal quota exceeded".to_string(),
                Some(json!({ "used": used, "limit": limit })),
            ),
            AppError::RateLimited { retry_after_secs } => (
                StatusCode::TOO_MANY_REQUESTS,
                "RATE_LIMITED",
                "Too many requests".to_string(),
                Some(json!({ "retry_after_secs": retry_after_secs })),
            ),
            AppError::GenerationStage { stage, message } => {
                tracing::error!("Generation stage {stage} failed: {message}");
                (
                    StatusCode::BAD_GATEWAY,
                    "GENERATION_FAILED",
                    format!("Proposal generation failed at the {stage} stage"),
                    None,
                )
            }
            AppError::Evaluation(msg) => {
                tracing::error!("Evaluation error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "EVALUATION_FAILED",
                    "Quality evaluation failed".to_string(),
                    None,
                )
            }
            AppError::Auxiliary(msg) => {
                tracing::error!("Auxiliary generator error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "AUXILIARY_FAILED",
                    "An auxiliary generator failed".to_string(),
                    None,
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                    None,
                )
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_ERROR",
                    "An AI processing error occurred".to_string(),
                    None,
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    None,
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let Some(details) = details {
            error["details"] = details;
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_exceeded_maps_to_429() {
        let response = AppError::QuotaExceeded { used: 101, limit: 100 }.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn test_rate_limited_maps_to_429() {
        let response = AppError::RateLimited { retry_after_secs: 60 }.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn test_validation_maps_to_400() {
        let response = AppError::Validation("rfp_text cannot be empty".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_generation_stage_maps_to_502() {
        let response = AppError::GenerationStage {
            stage: Stage::Analysis,
            message: "no parseable output".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
