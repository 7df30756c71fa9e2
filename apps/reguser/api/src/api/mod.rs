use axum::{Router, middleware, routing::get};
use axum_helpers::{SharedVerifier, StaticCredentials, basic_auth_middleware};
use domain_users::handlers;
use std::sync::Arc;

use crate::state::AppState;

pub mod health;

/// User routes behind HTTP Basic authentication.
///
/// `route_layer` keeps unknown paths on the JSON 404 fallback instead of
/// answering them with a 401 challenge.
pub fn routes(state: &AppState) -> Router {
    let verifier: SharedVerifier = Arc::new(StaticCredentials::from(state.config.auth.clone()));

    handlers::router(state.repository.clone(), state.shutdown.token())
        .route_layer(middleware::from_fn_with_state(verifier, basic_auth_middleware))
}

/// Creates a router with the /ready endpoint that checks the user store.
pub fn ready_router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
