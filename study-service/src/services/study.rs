//! The prompt relay: render a prompt, call the model once, shape the reply.

use crate::error::StudyError;
use crate::models::{
    ExplanationResponse, QuizResponse, ScoreResponse, StudyHelpResponse,
};
use crate::normalize::{strip_code_fences, strip_generic_fences};
use crate::prompts;
use crate::services::providers::{GenerationParams, TextProvider};
use std::sync::Arc;

/// Relay between the HTTP handlers and the text provider.
///
/// Built once at startup and shared read-only between requests.
#[derive(Clone)]
pub struct StudyService {
    provider: Arc<dyn TextProvider>,
    params: GenerationParams,
}

impl StudyService {
    pub fn new(provider: Arc<dyn TextProvider>, params: GenerationParams) -> Self {
        Self { provider, params }
    }

    pub fn provider(&self) -> &Arc<dyn TextProvider> {
        &self.provider
    }

    async fn complete(&self, operation: &'static str, prompt: &str) -> Result<String, StudyError> {
        let response = self
            .provider
            .generate(prompt, &self.params)
            .await
            .map_err(|e| {
                tracing::error!(
                    operation,
                    provider = self.provider.name(),
                    error = %e,
                    "Model call failed"
                );
                StudyError::from(e)
            })?;

        tracing::info!(
            operation,
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            "Model call completed"
        );

        Ok(response.text)
    }

    /// Ask for a ten-question quiz and parse the reply as JSON.
    #[tracing::instrument(skip(self))]
    pub async fn generate_quiz(
        &self,
        topic: &str,
        difficulty: &str,
    ) -> Result<QuizResponse, StudyError> {
        let prompt = prompts::quiz_prompt(topic, difficulty);
        let raw = self.complete("generate_quiz", &prompt).await?;

        tracing::info!(
            raw_len = raw.len(),
            raw_response = %raw,
            "Generated quiz response"
        );

        let cleaned = strip_code_fences(&raw);
        let quiz: QuizResponse = serde_json::from_str(&cleaned).map_err(|e| {
            tracing::error!(error = %e, "Quiz response is not valid JSON");
            StudyError::MalformedModelOutput(e)
        })?;

        for issue in quiz.consistency_issues() {
            tracing::warn!(issue = %issue, "Quiz deviates from the requested shape");
        }

        Ok(quiz)
    }

    /// Plain-language explanation of a question/answer pair, returned as-is.
    #[tracing::instrument(skip(self))]
    pub async fn explain(
        &self,
        question: &str,
        answer: &str,
    ) -> Result<ExplanationResponse, StudyError> {
        let prompt = prompts::explanation_prompt(question, answer);
        let explanation = self.complete("get_explanation", &prompt).await?;
        Ok(ExplanationResponse { explanation })
    }

    /// Free-text evaluation of the answers; no scoring happens here.
    #[tracing::instrument(skip(self, user_answers), fields(answer_count = user_answers.len()))]
    pub async fn evaluate_score(
        &self,
        user_answers: &[serde_json::Value],
    ) -> Result<ScoreResponse, StudyError> {
        let prompt = prompts::score_prompt(user_answers);
        let feedback = self.complete("evaluate_score", &prompt).await?;
        Ok(ScoreResponse { feedback })
    }

    #[tracing::instrument(skip(self, message), fields(message_len = message.len()))]
    pub async fn study_help(&self, message: &str) -> Result<StudyHelpResponse, StudyError> {
        let prompt = prompts::study_help_prompt(message);
        let raw = self.complete("study_help", &prompt).await?;
        Ok(StudyHelpResponse {
            help: strip_generic_fences(&raw),
        })
    }
}
