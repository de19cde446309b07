//! Router setup with all routes and middleware.
//!
//! Configures the axum Router with CORS, tracing, compression and the
//! request body limit.

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use parlance_core::config::ParlanceConfig;
use parlance_core::error::ParlanceError;

use crate::handlers;
use crate::state::AppState;

/// Create the axum Router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // Allow the relay's own origin plus port+1 for a separately served widget.
    let port = state.config.server.port;
    let dev_port = port.saturating_add(1);
    let origins: Vec<HeaderValue> = [port, dev_port]
        .iter()
        .flat_map(|p| {
            [
                format!("http://127.0.0.1:{}", p),
                format!("http://localhost:{}", p),
            ]
        })
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let body_limit = state.config.server.body_limit_bytes;

    Router::new()
        .route("/", get(handlers::widget))
        .route("/health", get(handlers::health))
        .route("/api/prompt", post(handlers::prompt))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server on the configured address.
pub async fn start_server(config: &ParlanceConfig, state: AppState) -> Result<(), ParlanceError> {
    let addr = config.server.bind_addr();
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ParlanceError::Api(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!(addr = %addr, "Relay listening");
    tracing::info!("Chat widget at http://{}/", addr);

    axum::serve(listener, router)
        .await
        .map_err(|e| ParlanceError::Api(format!("Server error: {}", e)))?;

    Ok(())
}
