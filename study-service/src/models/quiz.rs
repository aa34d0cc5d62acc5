//! Quiz request and response shapes.

use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// Number of questions the quiz prompt asks for.
pub const QUIZ_QUESTION_COUNT: usize = 10;

/// Number of options each question is asked to carry.
pub const QUIZ_OPTION_COUNT: usize = 4;

/// Request body for `POST /generate-quiz`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QuizRequest {
    #[validate(length(min = 1, message = "topic must not be empty"))]
    pub topic: String,

    #[validate(length(min = 1, message = "difficulty must not be empty"))]
    pub difficulty: String,
}

/// A single multiple-choice question as produced by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(deserialize_with = "text_or_number")]
    pub id: String,
    pub question: String,
    #[serde(deserialize_with = "texts_or_numbers")]
    pub options: Vec<String>,
    #[serde(deserialize_with = "text_or_number")]
    pub correct_answer: String,
    pub explanation: String,
}

/// Models often emit `"id": 1` or numeric options; both are kept as text.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(serde_json::Number),
}

impl From<Scalar> for String {
    fn from(value: Scalar) -> Self {
        match value {
            Scalar::Text(text) => text,
            Scalar::Number(number) => number.to_string(),
        }
    }
}

fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Scalar::deserialize(deserializer).map(String::from)
}

fn texts_or_numbers<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<Scalar>::deserialize(deserializer).map(|v| v.into_iter().map(String::from).collect())
}

/// Response body for `POST /generate-quiz`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResponse {
    pub questions: Vec<Question>,
}

impl QuizResponse {
    /// Places where the model strayed from what the prompt asked for.
    ///
    /// These are reported, not enforced: the quiz is passed through as-is.
    pub fn consistency_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.questions.len() != QUIZ_QUESTION_COUNT {
            issues.push(format!(
                "expected {} questions, got {}",
                QUIZ_QUESTION_COUNT,
                self.questions.len()
            ));
        }

        for q in &self.questions {
            if q.options.len() != QUIZ_OPTION_COUNT {
                issues.push(format!(
                    "question {} has {} options",
                    q.id,
                    q.options.len()
                ));
            }
            if !q.options.iter().any(|o| o == &q.correct_answer) {
                issues.push(format!(
                    "question {} correctAnswer is not one of its options",
                    q.id
                ));
            }
        }

        issues
    }
}
