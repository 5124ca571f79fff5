//! Axum server wiring for the lookup proxy.
//!
//! One public route, one piece of shared state. The router is built
//! separately from the listener so tests can drive it directly.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use corpline_core::CorplineConfig;
use corpline_registry::{OutlineProvider, RegistryClient};
use tower_http::cors::CorsLayer;

use crate::handlers::corp_lookup;

/// Shared state for all lookup handlers.
#[derive(Clone)]
pub struct AppState {
    /// Provider the `/corp` handler forwards lookups through
    pub provider: Arc<dyn OutlineProvider>,
}

/// Builds the application router with the given state.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Lookup endpoint
        .route("/corp", get(corp_lookup))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Runs the lookup proxy until the process is stopped.
///
/// # Errors
///
/// Returns the underlying I/O error when the listener cannot bind or the
/// server loop fails.
pub async fn run_server(config: CorplineConfig) -> std::io::Result<()> {
    let client = RegistryClient::new(&config.upstream);
    let state = AppState {
        provider: Arc::new(client),
    };
    let app = build_router(state);

    let listener =
        tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    let addr = listener.local_addr()?;
    tracing::info!("Corp outline proxy listening on http://{addr}/corp");

    axum::serve(listener, app).await
}
