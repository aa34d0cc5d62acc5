#![allow(dead_code)]

use service_core::config::Config as CoreConfig;
use std::sync::Arc;
use study_service::config::{GoogleConfig, ModelConfig, ProviderKind, StudyConfig};
use study_service::services::providers::gemini::GEMINI_API_BASE;
use study_service::services::providers::mock::MockTextProvider;
use study_service::startup::Application;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: reqwest::Client,
    pub provider: MockTextProvider,
}

pub fn test_config() -> StudyConfig {
    StudyConfig {
        common: CoreConfig { port: 0 }, // Random port for testing
        provider: ProviderKind::Mock,
        models: ModelConfig {
            text_model: "gemini-1.5-flash".to_string(),
            api_base_url: GEMINI_API_BASE.to_string(),
            temperature: None,
            max_output_tokens: None,
            request_timeout_secs: None,
        },
        google: GoogleConfig {
            api_key: "test-api-key".to_string(),
        },
    }
}

impl TestApp {
    pub async fn spawn(provider: MockTextProvider) -> Self {
        let app = Application::build_with_provider(test_config(), Arc::new(provider.clone()))
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            client,
            provider,
        }
    }

    pub async fn post_json(&self, path: &str, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.address, path))
            .json(body)
            .send()
            .await
            .expect("Failed to send request")
    }
}
