//! # Web API
//!
//! Axum router over the registry service. All `/api` routes pass through the
//! identity middleware; `/health` does not.

use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;

pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod state;

use handlers::{health, registries};
use state::AppState;

/// Build the service router.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/registries",
            post(registries::create_registry).get(registries::list_registries),
        )
        .route("/registries/ping", post(registries::ping_registry))
        .route(
            "/registries/{id}",
            get(registries::get_registry)
                .put(registries::update_registry)
                .delete(registries::delete_registry),
        )
        .layer(from_fn_with_state(
            state.clone(),
            middleware::identity::attach_principal,
        ));

    Router::new()
        .route("/health", get(health::basic_health))
        .nest("/api", api)
        .with_state(state)
}
