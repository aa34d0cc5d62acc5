//! Prompt templates, one per operation.

use crate::models::quiz::{QUIZ_OPTION_COUNT, QUIZ_QUESTION_COUNT};

/// Prompt asking for a quiz as raw JSON in the `QuizResponse` shape.
pub fn quiz_prompt(topic: &str, difficulty: &str) -> String {
    format!(
        "Generate {count} multiple-choice questions for {topic} at {difficulty} difficulty. \
         Each question must have exactly {options} options. \
         Provide the response in **raw JSON format** (no markdown, no extra text) with the following structure:\n\
         {{\n\
         \x20 \"questions\": [\n\
         \x20   {{\n\
         \x20     \"id\": \"unique_question_id\",\n\
         \x20     \"question\": \"The actual question text?\",\n\
         \x20     \"options\": [\"option1\", \"option2\", \"option3\", \"option4\"],\n\
         \x20     \"correctAnswer\": \"Correct option text\",\n\
         \x20     \"explanation\": \"Brief explanation of the correct answer.\"\n\
         \x20   }},\n\
         \x20   ... (repeat for {count} questions) ...\n\
         \x20 ]\n\
         }}",
        count = QUIZ_QUESTION_COUNT,
        options = QUIZ_OPTION_COUNT,
    )
}

pub fn explanation_prompt(question: &str, answer: &str) -> String {
    format!(
        "Explain the following question and answer in simple terms:\n\n\
         Question: {question}\nAnswer: {answer}"
    )
}

/// Answers are rendered as a JSON array; their structure is not inspected.
pub fn score_prompt(user_answers: &[serde_json::Value]) -> String {
    let answers = serde_json::Value::Array(user_answers.to_vec());
    format!(
        "Evaluate the user's performance based on their answers:\n{answers}\n\
         Provide a score and feedback."
    )
}

pub fn study_help_prompt(message: &str) -> String {
    format!(
        "You are a friendly study guide helping a student learn. \
         Answer the student's question below concisely and accurately, \
         in plain text only. Do not use Markdown, code blocks, bullet symbols or headings.\n\n\
         Student: {message}"
    )
}
