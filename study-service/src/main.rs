use service_core::config::get_optional_env;
use service_core::observability::init_tracing;
use study_service::config::StudyConfig;
use study_service::startup::Application;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let otlp_endpoint = get_optional_env("OTLP_ENDPOINT");
    init_tracing("study-service", "info", otlp_endpoint.as_deref());

    let config = StudyConfig::load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        std::io::Error::other(format!("Startup error: {}", e))
    })?;

    app.run_until_stopped().await
}
