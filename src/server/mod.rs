//! HTTP surface
//!
//! Thin axum layer over the core prediction path. The model artifact is
//! loaded once at startup and injected read-only into every handler; no
//! other state is shared between requests.

pub mod handlers;

use crate::artifact::ModelArtifact;
use crate::catalog;
use crate::config::ExplainSettings;
use anyhow::Result;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Shared state injected into every handler
#[derive(Clone)]
pub struct AppState {
    pub model: Arc<ModelArtifact>,
    pub explain: ExplainSettings,
    pub catalog_url: String,
}

impl AppState {
    pub fn new(model: ModelArtifact, explain: ExplainSettings) -> Self {
        Self {
            model: Arc::new(model),
            explain,
            catalog_url: catalog::CATALOG_URL.to_string(),
        }
    }
}

/// Build the router with all routes and a permissive CORS layer
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/predict", post(handlers::predict))
        .route("/sample-data", get(handlers::sample_data))
        .route("/health", get(handlers::health))
        .layer(cors)
        .with_state(state)
}

/// Bind and serve until ctrl-c
pub async fn serve(state: AppState, addr: &str, port: u16) -> Result<()> {
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind((addr, port)).await?;

    info!("listening on http://{}:{}", addr, port);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    Ok(())
}
