//! Axum route handlers for the Synthesis API.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::{info, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::ImageInput;
use crate::state::AppState;
use crate::synthesis::models::SynthesisResult;

/// Multipart field carrying the portrait.
const IMAGE_FIELD: &str = "image";

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub data: SynthesisResult,
}

/// POST /api/generate
///
/// Accepts a multipart form with an `image` field and returns six profile prompts
/// and six photos. Any non-image fields are ignored.
pub async fn handle_generate(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<GenerateResponse>, AppError> {
    let multipart =
        multipart.map_err(|e| AppError::Validation(format!("Invalid multipart form: {e}")))?;
    let image = read_image_field(multipart)
        .await?
        .ok_or(AppError::MissingImage)?;

    let span = tracing::info_span!(
        "synthesis",
        synthesis_id = %Uuid::new_v4(),
        media_type = %image.media_type,
        bytes = image.data.len(),
    );

    let data = async {
        info!("Starting synthesis");
        state.synthesizer.synthesize(&image).await
    }
    .instrument(span)
    .await?;

    Ok(Json(GenerateResponse {
        success: true,
        data,
    }))
}

/// Reads the first non-empty `image` field into memory.
async fn read_image_field(mut multipart: Multipart) -> Result<Option<ImageInput>, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let media_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.map_err(multipart_error)?;

        if data.is_empty() {
            continue;
        }

        return Ok(Some(ImageInput::new(data, media_type.as_deref())));
    }

    Ok(None)
}

/// Keeps axum's own status for multipart failures: 413 when the body limit is hit,
/// 400 for everything else.
fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!(
            "Image exceeds the upload limit: {}",
            e.body_text()
        ))
    } else {
        AppError::Validation(format!("Failed to read multipart form: {}", e.body_text()))
    }
}
