//! # Registry Endpoints
//!
//! CRUD and probe handlers. Handlers stay thin: they pull the principal
//! resolved by the identity middleware, hand everything to
//! [`RegistryService`], and let [`ApiError`](crate::web::errors::ApiError)
//! map the classified outcome to a status code.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use tracing::info;

use crate::authz::Principal;
use crate::models::{NewRegistry, Registry, RegistryUpdate};
use crate::service::PingRequest;
use crate::web::errors::ApiResult;
use crate::web::state::AppState;

/// Create a registry: POST /api/registries
pub async fn create_registry(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(request): Json<NewRegistry>,
) -> ApiResult<(StatusCode, Json<Registry>)> {
    info!(name = %request.name, principal = %principal.name, "create registry requested");
    let registry = state.service.create(&principal, request).await?;
    Ok((StatusCode::CREATED, Json(registry)))
}

/// Fetch a registry by id: GET /api/registries/{id}
pub async fn get_registry(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Registry>> {
    let registry = state.service.get(&principal, id).await?;
    Ok(Json(registry))
}

/// List all registries: GET /api/registries
pub async fn list_registries(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<Vec<Registry>>> {
    let registries = state.service.list(&principal).await?;
    Ok(Json(registries))
}

/// Partially update a registry: PUT /api/registries/{id}
pub async fn update_registry(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
    Json(request): Json<RegistryUpdate>,
) -> ApiResult<Json<Registry>> {
    info!(registry_id = id, principal = %principal.name, "update registry requested");
    let registry = state.service.update(&principal, id, request).await?;
    Ok(Json(registry))
}

/// Delete a registry: DELETE /api/registries/{id}
pub async fn delete_registry(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    info!(registry_id = id, principal = %principal.name, "delete registry requested");
    state.service.delete(&principal, id).await?;
    Ok(StatusCode::OK)
}

/// Probe a registry endpoint: POST /api/registries/ping
pub async fn ping_registry(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(request): Json<PingRequest>,
) -> ApiResult<StatusCode> {
    info!(
        registry_id = request.id,
        principal = %principal.name,
        "registry probe requested"
    );
    state.service.ping(&principal, request).await?;
    Ok(StatusCode::OK)
}
