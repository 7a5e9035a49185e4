//! Beam Server - HTTP API for RCC beam design
//!
//! This crate provides:
//! - `POST /srrs_beam` - corrected section designs from every loaded model
//! - `GET /` and `GET /health` - liveness and loaded model listing
//! - Request logging and permissive CORS

pub mod api;
pub mod config;
pub mod middleware;
pub mod state;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use api::create_router;
pub use config::ServerConfig;
pub use state::AppState;

/// Router with tracing, request logging and CORS layers applied
pub fn build_app(state: AppState) -> Router {
    create_router(state)
        .layer(axum::middleware::from_fn(middleware::logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
