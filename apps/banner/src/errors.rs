use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::banner::error::BannerError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Banner(#[from] BannerError),

    #[error("Service busy: {0}")]
    Unavailable(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Banner(e) => banner_status(e),
            AppError::Unavailable(msg) => {
                tracing::warn!("Service unavailable: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "UNAVAILABLE",
                    "The service is shutting down".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

fn banner_status(error: &BannerError) -> (StatusCode, &'static str, String) {
    match error {
        BannerError::MissingInput(msg) => (StatusCode::BAD_REQUEST, "MISSING_INPUT", msg.clone()),
        BannerError::InvalidRequest(msg) => {
            (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
        }
        BannerError::Fetch { .. } => {
            tracing::warn!("Upstream fetch failed: {error}");
            (StatusCode::BAD_GATEWAY, "FETCH_ERROR", error.to_string())
        }
        BannerError::Decode(msg) => {
            tracing::warn!("Upstream content could not be decoded: {msg}");
            (StatusCode::BAD_GATEWAY, "DECODE_ERROR", msg.clone())
        }
        BannerError::Layout(msg) => {
            tracing::error!("Layout error: {msg}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "LAYOUT_ERROR",
                "The banner could not be laid out".to_string(),
            )
        }
        BannerError::FontNotRegistered(family) => {
            tracing::error!("Font family not registered: {family}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "FONT_ERROR",
                "A required font is not available".to_string(),
            )
        }
    }
}
