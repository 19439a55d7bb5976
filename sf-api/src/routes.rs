//! API routes
//!
//! Public surface: `/health`, `/metrics`, `/login`, `/signup`.
//! Everything under `/api/v1` requires a bearer token; unauthenticated
//! requests get a 401 pointing at [`LOGIN_PATH`]. Unknown paths fall
//! through to a structured 404.

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::{self, auth_middleware};
use crate::handlers::{self, dashboard, discovery, health, opportunities, solutions, templates};
use crate::metrics::metrics_middleware;
use crate::state::AppState;

/// Where unauthenticated clients are pointed
pub const LOGIN_PATH: &str = "/login";

/// Create the protected `/api/v1` router
pub fn create_v1_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        // Dashboard & account
        .route("/dashboard", get(dashboard::get_dashboard))
        .route("/me", get(auth::me))
        .route("/logout", post(auth::logout))
        // Solutions
        .route(
            "/solutions",
            get(solutions::list_solutions).post(solutions::create_solution),
        )
        .route(
            "/solutions/:id",
            get(solutions::get_solution)
                .put(solutions::update_solution)
                .delete(solutions::delete_solution),
        )
        .route("/solutions/:id/status", put(solutions::set_solution_status))
        // Opportunities
        .route(
            "/opportunities",
            get(opportunities::list_opportunities).post(opportunities::create_opportunity),
        )
        .route("/opportunities/summary", get(opportunities::opportunity_summary))
        .route(
            "/opportunities/:id",
            get(opportunities::get_opportunity)
                .put(opportunities::update_opportunity)
                .delete(opportunities::delete_opportunity),
        )
        .route(
            "/opportunities/:id/session",
            put(opportunities::link_discovery_session),
        )
        // Discovery sessions
        .route(
            "/discovery",
            get(discovery::list_sessions).post(discovery::create_session),
        )
        .route(
            "/discovery/:id",
            get(discovery::get_session)
                .put(discovery::update_session)
                .delete(discovery::delete_session),
        )
        .route("/discovery/:id/notes", put(discovery::save_notes))
        .route("/discovery/:id/template", put(discovery::attach_template))
        .route(
            "/discovery/:id/sections",
            get(discovery::get_section_notes).put(discovery::save_section_notes),
        )
        .route(
            "/discovery/:id/solutions",
            get(discovery::list_linked_solutions).post(discovery::link_solution),
        )
        .route(
            "/discovery/:id/solutions/:solution_id",
            axum::routing::delete(discovery::unlink_solution),
        )
        // Template settings
        .route(
            "/settings/templates",
            get(templates::list_templates).post(templates::create_template),
        )
        .route(
            "/settings/templates/:id",
            put(templates::update_template).delete(templates::delete_template),
        )
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Create the full router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Public surface
        .route("/health", get(health::health_check))
        .route("/metrics", get(health::render_metrics))
        .route(LOGIN_PATH, post(auth::login))
        .route("/signup", post(auth::signup))
        // Protected area
        .nest("/api/v1", create_v1_router(state.clone()))
        .fallback(handlers::not_found)
        .with_state(state)
}

/// Build the application with middleware layers applied
pub fn build_app(state: Arc<AppState>) -> Router {
    let enable_cors = state.config.enable_cors;

    let mut router = create_router(state)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http());

    if enable_cors {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }
    router
}
