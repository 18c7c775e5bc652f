//! HTTP server for recap
//!
//! Exposes `POST {api_prefix}/summarize` taking a multipart WebVTT upload.

mod error;
mod summarize;

use anyhow::{Context, Result};
use axum::{extract::DefaultBodyLimit, routing::post, Router};
use std::sync::Arc;
use tower_http::{
    cors::{self, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::config::{ServerSettings, Settings};
use crate::llm::{build_provider, build_token_counter};
use crate::service::TranscriptService;

pub use error::{ApiError, ErrorResponse};
pub use summarize::SummarizeResponse;

#[derive(Clone)]
pub struct AppState {
    pub service: TranscriptService,
    pub allowed_extensions: Arc<Vec<String>>,
}

/// Build the application router around an already constructed service.
pub fn router(service: TranscriptService, settings: &ServerSettings) -> Router {
    let state = AppState {
        service,
        allowed_extensions: Arc::new(settings.allowed_extensions.clone()),
    };

    let api = Router::new()
        .route("/summarize", post(summarize::handler))
        .with_state(state);

    let prefix = settings.api_prefix.trim().trim_end_matches('/');
    let app = if prefix.is_empty() {
        Router::new().merge(api)
    } else if prefix.starts_with('/') {
        Router::new().nest(prefix, api)
    } else {
        Router::new().nest(&format!("/{}", prefix), api)
    };

    app.fallback(not_found)
        .layer(DefaultBodyLimit::max(settings.max_upload_bytes))
        .layer(
            CorsLayer::new()
                .allow_origin(cors::Any)
                .allow_methods(cors::Any)
                .allow_headers(cors::Any),
        )
        .layer(TraceLayer::new_for_http())
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

/// Load the model backend and tokenizer, then serve until interrupted.
pub async fn run(settings: &Settings) -> Result<()> {
    info!("Starting recap server v{}", crate::VERSION);

    let provider = build_provider(settings)?;
    let counter = build_token_counter(settings)?;
    let service = TranscriptService::new(
        Arc::from(provider),
        counter,
        settings.summarizer.max_token_limit,
    );

    let app = router(service, &settings.server);

    let address = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Shutting down server");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
