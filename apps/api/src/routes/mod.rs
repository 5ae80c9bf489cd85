pub mod health;

use std::any::Any;

use axum::{
    extract::DefaultBodyLimit,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;

use crate::errors::AppError;
use crate::state::AppState;
use crate::synthesis::handlers;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/generate", post(handlers::handle_generate))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(state)
}

/// Renders a handler panic as the usual 500 envelope instead of dropping the connection.
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic".to_string()
    };
    AppError::Internal(anyhow::anyhow!(message)).into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::llm_client::LlmError;
    use crate::synthesis::orchestrator::{Synthesizer, FALLBACK_MODEL, PRIMARY_MODEL};
    use crate::synthesis::testing::ScriptedModel;

    const BOUNDARY: &str = "dexter-test-boundary";

    fn test_config(max_upload_bytes: usize) -> Config {
        Config {
            gemini_api_key: "test-key".to_string(),
            gemini_api_base: "http://127.0.0.1:9".to_string(),
            port: 0,
            rust_log: "debug".to_string(),
            max_upload_bytes,
            llm_timeout_secs: 1,
        }
    }

    fn app_with_limit(model: Arc<ScriptedModel>, max_upload_bytes: usize) -> Router {
        build_router(AppState {
            synthesizer: Arc::new(Synthesizer::new(model)),
            config: test_config(max_upload_bytes),
        })
    }

    fn app(model: Arc<ScriptedModel>) -> Router {
        app_with_limit(model, 1024 * 1024)
    }

    /// Builds a multipart body with one part per `(name, content_type, bytes)`.
    fn multipart_body(parts: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, content_type, bytes) in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match content_type {
                Some(ct) => body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"upload\"\r\n\
                         Content-Type: {ct}\r\n\r\n"
                    )
                    .as_bytes(),
                ),
                None => body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                ),
            }
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn generate_request(body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/generate")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn model_payload() -> String {
        let prompts: Vec<Value> = (0..6)
            .map(|i| {
                serde_json::json!({
                    "question": format!("Question {i}?"),
                    "answer": format!("Answer {i}."),
                    "vibe": "witty"
                })
            })
            .collect();
        let image_prompts: Vec<Value> = [
            "Outdoor Adventure",
            "Cozy Cafe",
            "Professional",
            "Candid",
            "Travel",
            "Hobby",
        ]
        .iter()
        .map(|style| serde_json::json!({ "style": style, "prompt": "A photo." }))
        .collect();
        format!(
            "Sure! {}",
            serde_json::json!({ "prompts": prompts, "imagePrompts": image_prompts })
        )
    }

    #[tokio::test]
    async fn test_panic_becomes_failure_envelope() {
        let response = panic_response(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = json_body(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "boom");
    }

    #[tokio::test]
    async fn test_health_reports_ok() {
        let response = app(Arc::new(ScriptedModel::new(vec![])))
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_generate_returns_six_prompts_and_photos() {
        let model = Arc::new(ScriptedModel::new(vec![Ok(model_payload())]));
        let body = multipart_body(&[("image", Some("image/png"), &b"\x89PNG fake"[..])]);

        let response = app(model.clone())
            .oneshot(generate_request(body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["prompts"].as_array().unwrap().len(), 6);
        assert_eq!(json["data"]["photos"].as_array().unwrap().len(), 6);
        assert_eq!(json["data"]["prompts"][0]["vibe"], "witty");
        assert!(json["data"]["photos"][1]["url"]
            .as_str()
            .unwrap()
            .contains("photo-1554118811"));

        let calls = model.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].media_type, "image/png");
        assert_eq!(calls[0].image_len, 9);
    }

    #[tokio::test]
    async fn test_upload_above_axum_default_within_limit_is_accepted() {
        let model = Arc::new(ScriptedModel::new(vec![Ok(model_payload())]));
        let image = vec![0xAB_u8; 2_500_000];
        let body = multipart_body(&[("image", Some("image/jpeg"), &image[..])]);

        let response = app_with_limit(model.clone(), 4 * 1024 * 1024)
            .oneshot(generate_request(body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["success"], true);
        assert_eq!(model.calls()[0].image_len, 2_500_000);
    }

    #[tokio::test]
    async fn test_upload_over_limit_is_payload_too_large() {
        let model = Arc::new(ScriptedModel::new(vec![Ok(model_payload())]));
        let image = vec![0xAB_u8; 2 * 1024 * 1024];
        let body = multipart_body(&[("image", Some("image/jpeg"), &image[..])]);

        let response = app_with_limit(model.clone(), 1024 * 1024)
            .oneshot(generate_request(body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let json = json_body(response).await;
        assert_eq!(json["success"], false);
        assert!(json["error"]
            .as_str()
            .unwrap()
            .starts_with("Image exceeds the upload limit"));
        assert!(model.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_image_field_is_bad_request() {
        let model = Arc::new(ScriptedModel::new(vec![]));
        let body = multipart_body(&[("caption", None, &b"hello"[..])]);

        let response = app(model.clone())
            .oneshot(generate_request(body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "No image provided");
        assert!(model.calls().is_empty());
    }

    #[tokio::test]
    async fn test_empty_image_file_is_bad_request() {
        let body = multipart_body(&[("image", Some("image/jpeg"), &b""[..])]);

        let response = app(Arc::new(ScriptedModel::new(vec![])))
            .oneshot(generate_request(body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_non_multipart_body_is_bad_request() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/generate")
            .header("content-type", "application/json")
            .body(Body::from("{}"))
            .unwrap();

        let response = app(Arc::new(ScriptedModel::new(vec![])))
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["success"], false);
    }

    #[tokio::test]
    async fn test_both_models_failing_is_server_error() {
        let model = Arc::new(ScriptedModel::new(vec![
            Err(LlmError::EmptyContent),
            Err(LlmError::Api {
                status: 429,
                message: "quota exhausted".to_string(),
            }),
        ]));
        let body = multipart_body(&[("image", Some("image/jpeg"), &b"jpeg"[..])]);

        let response = app(model.clone())
            .oneshot(generate_request(body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = json_body(response).await;
        assert_eq!(json["success"], false);
        assert!(json["error"].as_str().unwrap().contains("quota exhausted"));
        assert_eq!(model.models_called(), vec![PRIMARY_MODEL, FALLBACK_MODEL]);
    }

    #[tokio::test]
    async fn test_garbage_model_output_still_succeeds() {
        let model = Arc::new(ScriptedModel::new(vec![Ok(
            "I cannot process this request.".to_string()
        )]));
        let body = multipart_body(&[("image", None, &b"raw bytes"[..])]);

        let response = app(model.clone())
            .oneshot(generate_request(body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["data"]["prompts"][0]["question"], "Secret talent?");
        assert_eq!(json["data"]["photos"].as_array().unwrap().len(), 6);
        assert_eq!(model.calls()[0].media_type, "image/jpeg");
    }
}
