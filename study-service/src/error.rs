//! Error kinds of the relay operations.

use crate::services::providers::ProviderError;
use service_core::error::AppError;
use thiserror::Error;

/// Message returned when a quiz reply cannot be parsed.
pub const MALFORMED_OUTPUT_MESSAGE: &str = "Invalid JSON format from AI response.";

#[derive(Debug, Error)]
pub enum StudyError {
    /// The model's text did not parse into the expected structure.
    #[error("Invalid JSON format from AI response.")]
    MalformedModelOutput(#[source] serde_json::Error),

    /// The model call itself failed.
    #[error(transparent)]
    Upstream(#[from] ProviderError),
}

impl From<StudyError> for AppError {
    fn from(err: StudyError) -> Self {
        match err {
            StudyError::MalformedModelOutput(source) => AppError::MalformedResponse {
                message: MALFORMED_OUTPUT_MESSAGE.to_string(),
                details: source.to_string(),
            },
            StudyError::Upstream(source) => AppError::UpstreamError(source.to_string()),
        }
    }
}
