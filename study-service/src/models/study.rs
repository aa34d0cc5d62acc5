//! Free-text request and response shapes: explanations, score feedback and
//! study help.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplanationRequest {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplanationResponse {
    pub explanation: String,
}

/// Answers are opaque: they are only interpolated into the prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRequest {
    pub user_answers: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub feedback: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyHelpRequest {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyHelpResponse {
    pub help: String,
}
