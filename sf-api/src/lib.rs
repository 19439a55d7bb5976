//! ServiceFlow API - HTTP interface layer
//!
//! Exposes the sales-operations surface over HTTP:
//!
//! # Endpoints
//!
//! ## Public
//! - `GET /health` - service health
//! - `GET /metrics` - Prometheus metrics (when enabled)
//! - `POST /signup`, `POST /login` - account + bearer token
//!
//! ## Protected (`/api/v1`, bearer token)
//! - `GET /dashboard` - headline tallies
//! - `GET|POST /solutions`, `GET|PUT|DELETE /solutions/:id`,
//!   `PUT /solutions/:id/status`
//! - `GET|POST /opportunities`, `GET /opportunities/summary`,
//!   `GET|PUT|DELETE /opportunities/:id`, `PUT /opportunities/:id/session`
//! - `GET|POST /discovery`, `GET|PUT|DELETE /discovery/:id`, plus
//!   `/notes`, `/template`, `/sections` and `/solutions` sub-resources
//! - `GET|POST /settings/templates`, `PUT|DELETE /settings/templates/:id`
//! - `POST /logout`, `GET /me`
//!
//! # Usage Example
//!
//! ```ignore
//! use sf_api::{ApiConfig, AppState, build_app};
//! use sf_db::Database;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let db = Database::open("serviceflow.db").unwrap();
//!     db.init_schema().await.unwrap();
//!
//!     let state = AppState::new(ApiConfig::default(), db);
//!     let app = build_app(Arc::new(state));
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:4000").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```

pub mod auth;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod invalidation;
pub mod metrics;
pub mod routes;
pub mod state;

use std::sync::Arc;

// Re-export main types
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use invalidation::{Collection, MutationKind};
pub use routes::{build_app, create_router, LOGIN_PATH};
pub use state::{ApiConfig, AppState, AuthSession};

/// API version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Start the API server with the given state
pub async fn start_server(state: AppState) -> std::io::Result<()> {
    let addr = state.config.listen_addr.clone();
    let app = build_app(Arc::new(state));

    tracing::info!(%addr, "starting ServiceFlow API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await
}
