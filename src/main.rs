use ai_gateway::config::GatewayConfig;
use ai_gateway::observability::init_tracing;
use ai_gateway::startup::Application;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Missing required configuration (e.g. GEMINI_API_KEY) is fatal: the
    // process must not come up serving traffic it cannot forward.
    let config = GatewayConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    init_tracing("info", config.server.debug);

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        std::io::Error::other(format!("Startup error: {}", e))
    })?;

    tracing::info!("ai-gateway listening on port {}", app.port());

    app.run_until_stopped().await
}
