//! Admin API: read-only inspection of the running proxy.

pub mod auth;
pub mod handlers;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use self::auth::admin_auth_middleware;
use self::handlers::*;
use crate::http::server::AppState;

pub fn setup_admin_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/admin/status", get(get_status))
        .route("/admin/recipients", get(get_recipients))
        .route("/admin/diagnostics", get(get_diagnostics))
        .route("/admin/diagnostics/reset", post(reset_diagnostics))
        .layer(middleware::from_fn_with_state(state, admin_auth_middleware))
}
