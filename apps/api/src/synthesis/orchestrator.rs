//! Request Orchestrator — one portrait in, raw model text out.
//!
//! Flow: primary model → (on any failure) fallback model → normalize.
//! The two attempts are awaited one after the other; there is no third attempt.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::llm_client::{ImageInput, VisionModel};
use crate::synthesis::models::SynthesisResult;
use crate::synthesis::normalizer::normalize;
use crate::synthesis::prompts::profile_analysis_instruction;

/// Tried first for every synthesis.
pub const PRIMARY_MODEL: &str = "gemini-2.5-flash";
/// Tried once, with identical inputs, when the primary call fails.
pub const FALLBACK_MODEL: &str = "gemini-2.0-flash";

pub struct Synthesizer {
    model: Arc<dyn VisionModel>,
    instruction: String,
}

impl Synthesizer {
    pub fn new(model: Arc<dyn VisionModel>) -> Self {
        Self {
            model,
            instruction: profile_analysis_instruction(),
        }
    }

    /// Obtains raw completion text, falling back to `FALLBACK_MODEL` once.
    pub async fn request_raw(&self, image: &ImageInput) -> Result<String, AppError> {
        info!("Attempting generation with {PRIMARY_MODEL}...");
        let primary_err = match self
            .model
            .generate(PRIMARY_MODEL, &self.instruction, image)
            .await
        {
            Ok(text) => return Ok(text),
            Err(e) => e,
        };
        warn!("{PRIMARY_MODEL} failed: {primary_err}");

        info!("Attempting generation with {FALLBACK_MODEL}...");
        self.model
            .generate(FALLBACK_MODEL, &self.instruction, image)
            .await
            .map_err(|e| {
                error!("{FALLBACK_MODEL} failed: {e}");
                AppError::Synthesis(e.to_string())
            })
    }

    /// Full synthesis: model call(s), then normalization to six prompts and six photos.
    pub async fn synthesize(&self, image: &ImageInput) -> Result<SynthesisResult, AppError> {
        let raw = self.request_raw(image).await?;
        info!("Raw response received ({} chars). Parsing...", raw.len());
        Ok(normalize(&raw))
    }
}
