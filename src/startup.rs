//! Application startup and lifecycle management.

use crate::build_router;
use crate::config::GatewayConfig;
use crate::error::AppError;
use crate::services::providers::gemini::GeminiProvider;
use crate::services::providers::GenerativeProvider;
use crate::services::ImageCache;
use crate::AppState;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: GatewayConfig) -> Result<Self, AppError> {
        let provider: Arc<dyn GenerativeProvider> =
            Arc::new(GeminiProvider::new(config.gemini.clone()));

        tracing::info!(
            chat_model = %config.gemini.chat_model,
            vision_model = %config.gemini.vision_model,
            image_model = %config.gemini.image_model,
            "Initialized Gemini provider"
        );

        let image_cache = Arc::new(ImageCache::new(config.cache.capacity));
        tracing::info!(
            capacity = config.cache.capacity,
            "Initialized image cache"
        );

        let state = AppState {
            config: config.clone(),
            provider,
            image_cache,
        };

        // Port 0 = random port, used by the tests.
        let addr = format!("{}:{}", config.server.host, config.server.port);
        let listener = TcpListener::bind(&addr).await.map_err(|e| {
            tracing::error!("Failed to bind listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped or signalled.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);
        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
