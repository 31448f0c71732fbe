pub mod config;
pub mod dtos;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod services;
pub mod startup;
pub mod utils;

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::GatewayConfig;
use crate::services::providers::GenerativeProvider;
use crate::services::ImageCache;

/// Uploads larger than this are rejected before reaching a handler.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health_check,
        handlers::health::ping,
        handlers::chat::chat,
        handlers::chat::reset_chat,
        handlers::image::analyze_image,
        handlers::image::generate_image,
        handlers::image::stream_generated_image,
    ),
    components(
        schemas(
            dtos::ErrorResponse,
            dtos::ChatRequest,
            dtos::ChatResponse,
            dtos::AnalyzeImageResponse,
            dtos::GenerateImageRequest,
            dtos::GenerateImageResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Chat", description = "Conversational endpoint over the shared session"),
        (name = "Images", description = "Image analysis and generation"),
        (name = "Observability", description = "Service health"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-API-Key"))),
            );
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: GatewayConfig,
    pub provider: Arc<dyn GenerativeProvider>,
    pub image_cache: Arc<ImageCache>,
}

pub fn build_router(state: AppState) -> Router {
    // Functional endpoints sit behind the shared-secret gate. The stream
    // endpoint stays public: ids are unguessable and the consumer is an
    // <img> tag that cannot send custom headers.
    let protected = Router::new()
        .route("/chat", post(handlers::chat::chat))
        .route("/chat/reset", post(handlers::chat::reset_chat))
        .route("/analyze-image", post(handlers::image::analyze_image))
        .route("/generate-image", post(handlers::image::generate_image))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::api_key_middleware,
        ));

    let mut app = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ping", get(handlers::health::ping))
        .route(
            "/generate-image/stream/:image_id",
            get(handlers::image::stream_generated_image),
        );

    if state.config.server.debug {
        app =
            app.merge(SwaggerUi::new("/docs").url("/.well-known/openapi.json", ApiDoc::openapi()));
    } else {
        // Swagger UI off outside debug, but keep the OpenAPI JSON for
        // programmatic access.
        app = app.route(
            "/.well-known/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        );
    }

    app.merge(protected)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
