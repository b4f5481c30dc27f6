use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use flair_classifier::{Label, Predictor};

pub mod components;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod pages;
pub mod rest;
pub mod templates;

pub use config::{Config, ConfigError};
pub use error::ApiError;
pub use fetcher::ThreadFetcher;

pub struct AppState {
    pub predictor: Arc<Predictor>,
    pub fetcher: Arc<dyn ThreadFetcher>,
    pub upload_dir: PathBuf,
}

/// Fetch a thread and classify its comments and title.
pub async fn classify_url(state: &AppState, url: &str) -> anyhow::Result<Label> {
    let thread = state
        .fetcher
        .fetch_thread(url)
        .await
        .with_context(|| format!("fetching thread {:?}", url.trim()))?;

    let prediction = state
        .predictor
        .predict(&thread.combined_text())
        .with_context(|| format!("classifying thread {}", thread.id))?;

    tracing::info!(
        thread_id = %thread.id,
        comments = thread.comments.len(),
        label = %prediction.label,
        "Predicted flair"
    );
    Ok(prediction.label)
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(pages::home))
        .route("/predict", post(pages::predict))
        .route("/automated_testing", post(rest::automated_testing))
        .with_state(state)
        // Logging layer: method + path only
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        )
}
