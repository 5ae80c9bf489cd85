use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every variant renders the same envelope the page expects:
/// `{ "success": false, "error": "<message>" }`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("No image provided")]
    MissingImage,

    #[error("{0}")]
    Validation(String),

    /// The request body exceeded `MAX_UPLOAD_BYTES`.
    #[error("{0}")]
    PayloadTooLarge(String),

    /// Both the primary and the fallback model call failed.
    #[error("{0}")]
    Synthesis(String),

    #[error("{0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingImage | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Synthesis(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            AppError::Synthesis(msg) => tracing::error!("Synthesis error: {msg}"),
            AppError::Internal(e) => tracing::error!("Internal error: {e:?}"),
            AppError::MissingImage | AppError::Validation(_) | AppError::PayloadTooLarge(_) => {}
        }

        let body = Json(json!({
            "success": false,
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_image_is_client_error() {
        assert_eq!(AppError::MissingImage.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::MissingImage.to_string(), "No image provided");
    }

    #[test]
    fn test_synthesis_error_keeps_underlying_message() {
        let err = AppError::Synthesis("model overloaded".to_string());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "model overloaded");
    }

    #[test]
    fn test_payload_too_large_maps_to_413() {
        let err = AppError::PayloadTooLarge("Image exceeds the upload limit".to_string());
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_error_body_is_failure_envelope() {
        let response = AppError::Validation("bad form".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "bad form");
        assert!(body.get("data").is_none());
    }
}
