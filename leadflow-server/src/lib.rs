//! HTTP service boundary for the leadflow pipeline.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, missing_docs, rust_2018_idioms)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

pub mod backend;
pub mod config;
pub mod handlers;

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::backend::ResearchBackend;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The research backend selected at construction time.
    pub backend: Arc<dyn ResearchBackend>,
}

/// Builds the router.
#[must_use]
pub fn create_app(backend: Arc<dyn ResearchBackend>) -> Router {
    Router::new()
        .route("/research", post(handlers::research))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { backend })
}

/// Binds the address and serves requests until shutdown.
///
/// # Errors
///
/// Returns an IO error when the address cannot be bound or the server
/// fails while running.
pub async fn run(addr: &str, backend: Arc<dyn ResearchBackend>) -> std::io::Result<()> {
    let app = create_app(backend);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(%addr, "leadflow API listening");
    axum::serve(listener, app).await
}
