use crate::services::providers::gemini::GEMINI_API_BASE;
use serde::Deserialize;
use service_core::config::{self as core_config, get_env, get_optional_env, is_production};
use service_core::error::AppError;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct StudyConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub provider: ProviderKind,
    pub models: ModelConfig,
    pub google: GoogleConfig,
}

/// Which text provider backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Gemini,
    Mock,
}

impl std::str::FromStr for ProviderKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(ProviderKind::Gemini),
            "mock" => Ok(ProviderKind::Mock),
            other => Err(AppError::ConfigError(anyhow::anyhow!(
                "GENAI_PROVIDER must be 'gemini' or 'mock', got '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Model used for every operation (e.g., gemini-1.5-flash)
    pub text_model: String,
    pub api_base_url: String,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<i32>,
    /// Unset means the model call has no explicit timeout.
    pub request_timeout_secs: Option<u64>,
}

impl ModelConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleConfig {
    pub api_key: String,
}

impl StudyConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = is_production();

        let provider: ProviderKind = get_env("GENAI_PROVIDER", Some("gemini"), false)?.parse()?;

        // The mock needs no credential; Gemini fails fast without one.
        let api_key = match provider {
            ProviderKind::Gemini => get_env("GOOGLE_API_KEY", None, is_prod)?,
            ProviderKind::Mock => get_optional_env("GOOGLE_API_KEY").unwrap_or_default(),
        };

        Ok(StudyConfig {
            common: common_config,
            provider,
            models: ModelConfig {
                text_model: get_env("GENAI_TEXT_MODEL", Some("gemini-1.5-flash"), is_prod)?,
                api_base_url: get_env("GENAI_API_BASE_URL", Some(GEMINI_API_BASE), false)?,
                temperature: parse_optional("GENAI_TEMPERATURE")?,
                max_output_tokens: parse_optional("GENAI_MAX_OUTPUT_TOKENS")?,
                request_timeout_secs: parse_optional("GENAI_REQUEST_TIMEOUT_SECS")?,
            },
            google: GoogleConfig { api_key },
        })
    }
}

fn parse_optional<T>(key: &str) -> Result<Option<T>, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!("{} has an invalid value '{}': {}", key, raw, e))
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_kind_parses_case_insensitively() {
        assert_eq!("Gemini".parse::<ProviderKind>().unwrap(), ProviderKind::Gemini);
        assert_eq!(" mock ".parse::<ProviderKind>().unwrap(), ProviderKind::Mock);
        assert!("openai".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn parse_optional_handles_unset_and_invalid() {
        assert_eq!(
            parse_optional::<u64>("STUDY_SERVICE_TEST_UNSET_VAR").unwrap(),
            None
        );

        std::env::set_var("STUDY_SERVICE_TEST_BAD_TIMEOUT", "soon");
        let err = parse_optional::<u64>("STUDY_SERVICE_TEST_BAD_TIMEOUT").unwrap_err();
        assert!(err.to_string().contains("STUDY_SERVICE_TEST_BAD_TIMEOUT"));

        std::env::set_var("STUDY_SERVICE_TEST_GOOD_TIMEOUT", "30");
        assert_eq!(
            parse_optional::<u64>("STUDY_SERVICE_TEST_GOOD_TIMEOUT").unwrap(),
            Some(30)
        );
    }

    #[test]
    fn request_timeout_is_optional() {
        let models = ModelConfig {
            text_model: "gemini-1.5-flash".into(),
            api_base_url: GEMINI_API_BASE.into(),
            temperature: None,
            max_output_tokens: None,
            request_timeout_secs: None,
        };
        assert_eq!(models.request_timeout(), None);

        let models = ModelConfig {
            request_timeout_secs: Some(5),
            ..models
        };
        assert_eq!(models.request_timeout(), Some(Duration::from_secs(5)));
    }
}
