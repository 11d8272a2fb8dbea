use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use super::{handlers, jobs, middleware};
use crate::state::AppState;

/// Largest accepted upload body. Screenshots are small; this bound mostly
/// guards against accidental non-image uploads.
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

pub fn create_router(state: Arc<AppState>) -> Router {
    let web_root = state.web_root().to_path_buf();

    // API routes
    let api_routes = Router::new()
        // Jobs
        .route("/status", get(jobs::get_status))
        .route("/upload", post(jobs::upload))
        .route("/clipboard", post(jobs::clipboard))
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state);

    // Serve the web UI with SPA fallback
    let index_path = web_root.join("index.html");
    let serve_dir = ServeDir::new(&web_root).fallback(ServeFile::new(index_path));

    Router::new()
        .nest("/api", api_routes)
        .route("/metrics", get(handlers::metrics))
        .fallback_service(serve_dir)
        .layer(axum::middleware::from_fn(middleware::metrics_middleware))
        .layer(TraceLayer::new_for_http())
}
