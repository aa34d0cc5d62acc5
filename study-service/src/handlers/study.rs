use crate::models::{
    ExplanationRequest, ExplanationResponse, QuizRequest, QuizResponse, ScoreRequest,
    ScoreResponse, StudyHelpRequest, StudyHelpResponse,
};
use crate::startup::AppState;
use axum::{extract::State, Json};
use service_core::error::AppError;
use validator::Validate;

pub async fn generate_quiz(
    State(state): State<AppState>,
    Json(request): Json<QuizRequest>,
) -> Result<Json<QuizResponse>, AppError> {
    tracing::info!(
        topic = %request.topic,
        difficulty = %request.difficulty,
        "Received quiz request"
    );
    request.validate()?;

    let quiz = state
        .study
        .generate_quiz(&request.topic, &request.difficulty)
        .await?;

    Ok(Json(quiz))
}

pub async fn get_explanation(
    State(state): State<AppState>,
    Json(request): Json<ExplanationRequest>,
) -> Result<Json<ExplanationResponse>, AppError> {
    let response = state
        .study
        .explain(&request.question, &request.answer)
        .await?;

    Ok(Json(response))
}

pub async fn evaluate_score(
    State(state): State<AppState>,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<ScoreResponse>, AppError> {
    let response = state.study.evaluate_score(&request.user_answers).await?;
    Ok(Json(response))
}

pub async fn study_help(
    State(state): State<AppState>,
    Json(request): Json<StudyHelpRequest>,
) -> Result<Json<StudyHelpResponse>, AppError> {
    let response = state.study.study_help(&request.message).await?;
    Ok(Json(response))
}
