//! Test doubles shared by the synthesis and route tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;

use crate::llm_client::{ImageInput, LlmError, VisionModel};

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub model: String,
    pub instruction: String,
    pub media_type: String,
    pub image_len: usize,
}

/// Replays queued results in order and records every call it receives.
/// Once the queue is empty, further calls fail with `EmptyContent`.
pub struct ScriptedModel {
    responses: Mutex<VecDeque<Result<String, LlmError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedModel {
    pub fn new(responses: Vec<Result<String, LlmError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn models_called(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.model).collect()
    }
}

#[async_trait]
impl VisionModel for ScriptedModel {
    async fn generate(
        &self,
        model: &str,
        instruction: &str,
        image: &ImageInput,
    ) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(RecordedCall {
            model: model.to_string(),
            instruction: instruction.to_string(),
            media_type: image.media_type.clone(),
            image_len: image.data.len(),
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyContent))
    }
}

pub fn sample_image() -> ImageInput {
    ImageInput::new(Bytes::from_static(b"\xff\xd8\xff\xe0fake-jpeg"), Some("image/jpeg"))
}
