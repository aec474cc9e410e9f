//! distill-server - HTTP front end for distill.
//!
//! Routes:
//!
//! - `GET /health` - liveness, provider and model
//! - `GET /tasks` - task catalogue with budgets and section markers
//! - `POST /analyze` - multipart form (`task`, `text`, `file`,
//!   `job_description`, `max_marks`, `include_raw`) to analysis JSON
//!
//! # Example
//!
//! ```ignore
//! use distill_server::{create_server, create_state, load_config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let state = create_state(load_config()?)?;
//!     let app = create_server(state);
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod factory;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use factory::{create_state, load_config};
pub use state::AppState;

use axum::{middleware as axum_middleware, Router};
use tower_http::trace::TraceLayer;

/// Create the server with all routes and middleware.
pub fn create_server(state: AppState) -> Router {
    routes::create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors_layer())
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
}
