//! Router configuration, adapted from the teacher's
//! `examples/ticketing/src/server/routes.rs`.

use axum::middleware as axum_middleware;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{auth, health, lock, pay, release, reset, seats};
use crate::middleware::{auth_rate_limit, correlation_id_layer, rate_limit};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let lock_routes = Router::new()
        .route("/lock", post(lock::lock_seat))
        .layer(axum_middleware::from_fn_with_state(state.clone(), rate_limit));

    let auth_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/verify-register", post(auth::verify_register))
        .route("/auth/login", post(auth::login))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_rate_limit,
        ));

    let api_routes = Router::new()
        .route("/seats", get(seats::list_seats))
        .route("/release", post(release::release_seat))
        .route("/pay", post(pay::pay))
        .route("/reset", post(reset::reset))
        .merge(lock_routes)
        .merge(auth_routes);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .nest("/api", api_routes)
        .layer(correlation_id_layer())
        .with_state(state)
}
