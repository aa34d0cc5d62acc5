//! Request and response shapes for the study service.

pub mod quiz;
pub mod study;

pub use quiz::{Question, QuizRequest, QuizResponse};
pub use study::{
    ExplanationRequest, ExplanationResponse, ScoreRequest, ScoreResponse, StudyHelpRequest,
    StudyHelpResponse,
};
