// Web server: Axum JSON API in front of the analysis pipeline.
//
// Two routes do real work: one annotates a single image URL and returns the
// raw annotation record, the other takes a batch of feed posts and returns
// the aggregated Summary. Both are unauthenticated; CORS is limited to the
// configured front-end origin.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::vision::traits::VisionClient;

pub mod handlers;

/// Shared application state threaded through all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub vision: Arc<dyn VisionClient>,
    pub config: Arc<Config>,
}

/// Start the Axum web server and block until it exits.
pub async fn run_server(
    config: Config,
    vision: Arc<dyn VisionClient>,
    port: u16,
    bind: &str,
) -> Result<()> {
    let state = AppState {
        vision,
        config: Arc::new(config),
    };

    let app = build_router(state)?;

    let addr = format!("{bind}:{port}");
    info!("Cordoba server listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Assemble the router. Fails if the configured CORS origin is not a valid
/// header value.
pub fn build_router(state: AppState) -> Result<Router> {
    let origin: HeaderValue = state
        .config
        .allowed_origin
        .parse()
        .with_context(|| format!("Invalid CORS origin {:?}", state.config.allowed_origin))?;

    let router = Router::new()
        .route("/health", get(health))
        .route("/analyzeimage", get(handlers::analyze::analyze_image))
        .route("/instagrammedia", post(handlers::summary::summarize_media))
        .layer(
            CorsLayer::new()
                .allow_origin(origin)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(router)
}

/// Liveness check. Always 200 OK.
async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        axum::Json(serde_json::json!({ "status": "ok" })),
    )
}

/// Typed JSON error response helper.
pub fn api_error(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(serde_json::json!({ "error": message }))).into_response()
}
