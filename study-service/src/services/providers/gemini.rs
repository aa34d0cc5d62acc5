//! Gemini provider implementation.
//!
//! Implements text generation using Google's Gemini `generateContent` API.

use super::{FinishReason, GenerationParams, ProviderError, ProviderResponse, TextProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default Gemini API base URL.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini provider configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    /// `None` leaves the call without an explicit timeout.
    pub timeout: Option<Duration>,
}

/// Gemini text provider.
pub struct GeminiTextProvider {
    config: GeminiConfig,
    client: Client,
}

impl GeminiTextProvider {
    pub fn new(config: GeminiConfig) -> Result<Self, ProviderError> {
        if config.api_key.is_empty() {
            return Err(ProviderError::NotConfigured(
                "Gemini API key not configured".to_string(),
            ));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            ProviderError::NotConfigured(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self { config, client })
    }

    /// Build the API URL for the given model method.
    fn api_url(&self, method: &str) -> String {
        format!(
            "{}/models/{}:{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.model,
            method
        )
    }

    fn build_request(prompt: &str, params: &GenerationParams) -> GenerateContentRequest {
        let generation_config = if params.temperature.is_some() || params.max_tokens.is_some() {
            Some(GenerationConfig {
                temperature: params.temperature,
                max_output_tokens: params.max_tokens,
            })
        } else {
            None
        };

        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config,
        }
    }
}

/// Turn a decoded API response into the provider result.
///
/// Text is the concatenation of every text part of the first candidate.
fn extract_response(api_response: GenerateContentResponse) -> Result<ProviderResponse, ProviderError> {
    if let Some(reason) = api_response
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.as_deref())
    {
        tracing::warn!(block_reason = %reason, "Gemini blocked the prompt");
        return Err(ProviderError::ContentFiltered(format!(
            "prompt blocked: {}",
            reason
        )));
    }

    let candidate = api_response
        .candidates
        .into_iter()
        .next()
        .ok_or(ProviderError::EmptyResponse)?;

    let finish_reason = FinishReason::from_gemini(candidate.finish_reason.as_deref());
    if finish_reason == FinishReason::ContentFilter {
        return Err(ProviderError::ContentFiltered(format!(
            "finish reason {}",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        )));
    }

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(ProviderError::EmptyResponse);
    }

    let usage = api_response.usage_metadata.unwrap_or_default();

    Ok(ProviderResponse {
        text,
        input_tokens: usage.prompt_token_count.unwrap_or(0),
        output_tokens: usage.candidates_token_count.unwrap_or(0),
        finish_reason,
    })
}

#[async_trait]
impl TextProvider for GeminiTextProvider {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError> {
        let request = Self::build_request(prompt, params);
        let url = self.api_url("generateContent");

        tracing::debug!(
            model = %self.config.model,
            prompt_len = prompt.len(),
            "Sending request to Gemini API"
        );

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                return Err(ProviderError::RateLimited(error_text));
            }

            return Err(ProviderError::ApiError(format!(
                "Gemini API error {}: {}",
                status, error_text
            )));
        }

        let api_response: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ApiError(format!("Failed to parse response: {}", e)))?;

        let result = extract_response(api_response)?;

        tracing::debug!(
            input_tokens = result.input_tokens,
            output_tokens = result.output_tokens,
            finish_reason = ?result.finish_reason,
            "Gemini API call completed"
        );

        Ok(result)
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if self.config.api_key.is_empty() {
            Err(ProviderError::NotConfigured(
                "Gemini API key not configured".to_string(),
            ))
        } else {
            Ok(())
        }
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<i32>,
    candidates_token_count: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> GeminiConfig {
        GeminiConfig {
            api_key: "test-key".to_string(),
            model: "gemini-1.5-flash".to_string(),
            base_url: format!("{}/", GEMINI_API_BASE),
            timeout: None,
        }
    }

    fn decode(value: serde_json::Value) -> GenerateContentResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn api_url_joins_base_model_and_method() {
        let provider = GeminiTextProvider::new(config()).unwrap();
        assert_eq!(
            provider.api_url("generateContent"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn new_rejects_missing_api_key() {
        let mut cfg = config();
        cfg.api_key.clear();
        assert!(matches!(
            GeminiTextProvider::new(cfg),
            Err(ProviderError::NotConfigured(_))
        ));
    }

    #[test]
    fn request_omits_generation_config_by_default() {
        let request = GeminiTextProvider::build_request("hello", &GenerationParams::default());
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            json!({"contents": [{"role": "user", "parts": [{"text": "hello"}]}]})
        );
    }

    #[test]
    fn request_carries_generation_params() {
        let params = GenerationParams {
            temperature: Some(0.5),
            max_tokens: Some(2048),
        };
        let body = serde_json::to_value(GeminiTextProvider::build_request("hi", &params)).unwrap();
        assert_eq!(body["generationConfig"]["temperature"], json!(0.5));
        assert_eq!(body["generationConfig"]["maxOutputTokens"], json!(2048));
    }

    #[test]
    fn extract_concatenates_text_parts() {
        let response = decode(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Hello "}, {"text": "world"}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 7, "candidatesTokenCount": 3, "totalTokenCount": 10}
        }));

        let result = extract_response(response).unwrap();
        assert_eq!(result.text, "Hello world");
        assert_eq!(result.input_tokens, 7);
        assert_eq!(result.output_tokens, 3);
        assert_eq!(result.finish_reason, FinishReason::Complete);
    }

    #[test]
    fn extract_without_candidates_is_empty_response() {
        let response = decode(json!({"candidates": []}));
        assert!(matches!(
            extract_response(response),
            Err(ProviderError::EmptyResponse)
        ));
    }

    #[test]
    fn extract_maps_safety_to_content_filtered() {
        let response = decode(json!({
            "candidates": [{"finishReason": "SAFETY"}]
        }));
        match extract_response(response) {
            Err(ProviderError::ContentFiltered(reason)) => {
                assert_eq!(reason, "finish reason SAFETY")
            }
            other => panic!("unexpected result: {other:?}"),
        }

        let blocked = decode(json!({"promptFeedback": {"blockReason": "OTHER"}}));
        match extract_response(blocked) {
            Err(ProviderError::ContentFiltered(reason)) => {
                assert_eq!(reason, "prompt blocked: OTHER")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    /// Serve a fixed reply on a local port in place of the Gemini API.
    ///
    /// Requests for another path, or without the test key, get 404 / 401.
    async fn stub_gemini(status: axum::http::StatusCode, body: &'static str) -> GeminiConfig {
        use axum::http::{HeaderMap, StatusCode, Uri};

        let handler = move |headers: HeaderMap, uri: Uri| async move {
            if uri.path() != "/models/gemini-1.5-flash:generateContent" {
                return (StatusCode::NOT_FOUND, format!("unexpected path {}", uri.path()));
            }
            let key = headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok());
            if key != Some("test-key") {
                return (StatusCode::UNAUTHORIZED, "missing api key".to_string());
            }
            (status, body.to_string())
        };

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, axum::Router::new().fallback(handler))
                .await
                .ok();
        });

        GeminiConfig {
            base_url: format!("http://{}", addr),
            ..config()
        }
    }

    async fn generate_against(
        status: axum::http::StatusCode,
        body: &'static str,
    ) -> Result<ProviderResponse, ProviderError> {
        let provider = GeminiTextProvider::new(stub_gemini(status, body).await).unwrap();
        provider.generate("hello", &GenerationParams::default()).await
    }

    #[tokio::test]
    async fn generate_sends_api_key_and_reads_text() {
        let result = generate_against(
            axum::http::StatusCode::OK,
            r#"{"candidates":[{"content":{"parts":[{"text":"Hi there"}]},"finishReason":"STOP"}],
                "usageMetadata":{"promptTokenCount":2,"candidatesTokenCount":3}}"#,
        )
        .await
        .unwrap();

        assert_eq!(result.text, "Hi there");
        assert_eq!(result.input_tokens, 2);
        assert_eq!(result.output_tokens, 3);
    }

    #[tokio::test]
    async fn generate_keeps_quota_message_on_429() {
        let err = generate_against(
            axum::http::StatusCode::TOO_MANY_REQUESTS,
            "Resource has been exhausted (e.g. check quota).",
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ProviderError::RateLimited(_)));
        assert_eq!(
            err.to_string(),
            "Rate limited: Resource has been exhausted (e.g. check quota)."
        );
    }

    #[tokio::test]
    async fn generate_maps_other_status_to_api_error() {
        let err = generate_against(axum::http::StatusCode::FORBIDDEN, "API key not valid")
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "API error: Gemini API error 403 Forbidden: API key not valid"
        );
    }

    #[tokio::test]
    async fn generate_reports_undecodable_body() {
        let err = generate_against(axum::http::StatusCode::OK, "<html>oops</html>")
            .await
            .unwrap_err();

        match err {
            ProviderError::ApiError(msg) => assert!(msg.starts_with("Failed to parse response")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn generate_without_matching_key_is_rejected() {
        let mut cfg = stub_gemini(axum::http::StatusCode::OK, "{}").await;
        cfg.api_key = "other-key".to_string();
        let provider = GeminiTextProvider::new(cfg).unwrap();

        let err = provider
            .generate("hello", &GenerationParams::default())
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "API error: Gemini API error 401 Unauthorized: missing api key"
        );
    }
}
