//! Route definitions for the dashboard.

use crate::auth;
use crate::handlers;
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

/// Create the dashboard router. Every route except login, register and the
/// health check goes through the session guard.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/healthz", get(handlers::healthz))
        .route("/login", get(auth::login_page).post(auth::login_submit))
        .route("/register", get(auth::register_page).post(auth::register_submit))
        .route("/logout", post(auth::logout))
        .route("/dashboard", get(handlers::dashboard))
        .route("/dashboard/metrics", get(handlers::dashboard_metrics))
        .route("/info", get(handlers::info))
        .route("/control", get(handlers::control))
        .route("/control/board", get(handlers::control_board))
        .route("/control/events", get(handlers::control_events))
        .route("/control/{device}/{command}", post(handlers::control_command))
        .route("/reports", get(handlers::reports))
        .route("/reports/events", get(handlers::reports_events))
        .route("/reports/pdf", get(handlers::reports_pdf))
        .route("/users", get(handlers::users).post(handlers::users_create))
        .route("/users/table", get(handlers::users_table))
        .route("/users/new", get(handlers::users_new))
        .route("/users/{id}", post(handlers::users_update))
        .route("/users/{id}/edit", get(handlers::users_edit))
        .route("/users/{id}/delete", post(handlers::users_delete))
        .layer(middleware::from_fn_with_state(state.clone(), auth::auth_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
