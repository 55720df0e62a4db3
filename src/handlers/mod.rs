pub mod extract;
pub mod health;

pub use extract::*;
pub use health::*;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::client::http::EXTRACT_PATH;
use crate::middleware::logging_middleware;
use crate::services::ExtractionJob;

/// Room for multipart framing on top of the file itself, so a file just over
/// the size limit still reaches the job and gets its regular error.
pub const MULTIPART_OVERHEAD: usize = 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub job: Arc<ExtractionJob>,
    pub max_file_size_mb: usize,
}

impl AppState {
    pub fn new(job: ExtractionJob, max_file_size_mb: usize) -> Self {
        Self {
            job: Arc::new(job),
            max_file_size_mb,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let body_limit = state.max_file_size_mb * 1024 * 1024 + MULTIPART_OVERHEAD;

    Router::new()
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        .route(EXTRACT_PATH, post(extract_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(body_limit))
                .layer(axum::middleware::from_fn(logging_middleware)),
        )
        .with_state(state)
}
