//! Mock provider for testing and local development.

use super::{FinishReason, GenerationParams, ProviderError, ProviderResponse, TextProvider};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

type Responder = dyn Fn(&str) -> Result<String, ProviderError> + Send + Sync;

/// Mock text provider.
///
/// Answers every prompt through a responder closure. Scripted providers keep
/// a log of the prompts they were given; `echo`, which backs
/// `GENAI_PROVIDER=mock`, keeps one only after [`MockTextProvider::with_recording`].
#[derive(Clone)]
pub struct MockTextProvider {
    responder: Arc<Responder>,
    prompts: Option<Arc<Mutex<Vec<String>>>>,
}

impl MockTextProvider {
    /// Answer every prompt through `responder`, recording each prompt.
    pub fn from_fn<F>(responder: F) -> Self
    where
        F: Fn(&str) -> Result<String, ProviderError> + Send + Sync + 'static,
    {
        Self {
            responder: Arc::new(responder),
            prompts: None,
        }
        .with_recording()
    }

    /// Answer every prompt with the same text.
    pub fn with_response(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::from_fn(move |_| Ok(text.clone()))
    }

    /// Fail every call with an API error carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::from_fn(move |_| Err(ProviderError::ApiError(message.clone())))
    }

    /// Echo the prompt back, prefixed like a model reply. Records nothing.
    pub fn echo() -> Self {
        Self {
            responder: Arc::new(|prompt: &str| -> Result<String, ProviderError> {
                Ok(format!("Mock response for: {}", prompt))
            }),
            prompts: None,
        }
    }

    /// Start recording prompts, keeping any log already in place.
    pub fn with_recording(mut self) -> Self {
        if self.prompts.is_none() {
            self.prompts = Some(Arc::new(Mutex::new(Vec::new())));
        }
        self
    }

    /// Prompts received so far, in call order. Empty when not recording.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .as_ref()
            .and_then(|log| log.lock().ok().map(|p| p.clone()))
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn generate(
        &self,
        prompt: &str,
        _params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError> {
        if let Some(Ok(mut prompts)) = self.prompts.as_ref().map(|log| log.lock()) {
            prompts.push(prompt.to_string());
        }

        let text = (self.responder)(prompt)?;

        Ok(ProviderResponse {
            output_tokens: text.len() as i32 / 4,
            text,
            input_tokens: prompt.len() as i32 / 4,
            finish_reason: FinishReason::Complete,
        })
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
