//! Route definitions for the HTTP API.

mod analyze;
mod health;
mod tasks;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Room for multipart boundaries and the text fields next to the file.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    let body_limit = state
        .config
        .max_upload_bytes
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Task catalogue
        .route("/tasks", get(tasks::list_tasks))
        // Analysis
        .route(
            "/analyze",
            post(analyze::analyze).layer(DefaultBodyLimit::max(body_limit)),
        )
        // Attach state
        .with_state(state)
}

pub use analyze::*;
pub use health::*;
pub use tasks::*;
