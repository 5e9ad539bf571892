//! HTTP server and WebSocket upgrade
//!
//! Authentication happens in the upgrade handler, before `on_upgrade`: a
//! bad credential gets a 401 response and no socket ever exists for it.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{State, WebSocketUpgrade},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::auth::{bearer_token, IdentityVerifier};
use crate::connection::run_connection;
use crate::registry::HandlerRegistry;

/// Everything the request handlers need, wired once at startup.
pub struct GatewayState {
    pub verifier: Arc<dyn IdentityVerifier>,
    pub registry: Arc<HandlerRegistry>,
}

/// Build the gateway router. Shared between production startup and tests.
pub fn build_app(state: Arc<GatewayState>, ws_path: &str) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route(ws_path, get(ws_upgrade_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until the process exits.
pub async fn run_server(state: Arc<GatewayState>, host: &str, port: u16, ws_path: &str) -> anyhow::Result<()> {
    let app = build_app(state, ws_path);
    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("kigo gateway listening on ws://{addr}{ws_path}");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health_handler(State(state): State<Arc<GatewayState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": kigo_core::VERSION,
        "handlers": state.registry.len(),
    }))
}

async fn ws_upgrade_handler(
    ws: WebSocketUpgrade,
    headers: HeaderMap,
    State(state): State<Arc<GatewayState>>,
) -> Response {
    let bearer = bearer_token(
        headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok()),
    );

    // Verify before upgrading; a failure refuses the handshake outright.
    let metadata = match state.verifier.verify(bearer).await {
        Ok(metadata) => metadata,
        Err(e) => {
            warn!("handshake refused: {e}");
            return (StatusCode::UNAUTHORIZED, Json(e.to_frame())).into_response();
        }
    };

    let registry = Arc::clone(&state.registry);
    ws.on_upgrade(move |socket| run_connection(socket, Some(metadata), registry))
}
