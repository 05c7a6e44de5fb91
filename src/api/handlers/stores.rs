//! Handlers for store management endpoints.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::store::{
    CreateStoreRequest, StoreItem, StoreListResponse, UpdateStoreRequest,
};
use crate::error::AppError;
use crate::state::AppState;

/// Registers a store, enriching it from its postal code.
///
/// # Endpoint
///
/// `POST /api/stores`
///
/// # Request Body
///
/// ```json
/// { "name": "Loja Paulista", "postal_code": "01310-100" }
/// ```
///
/// `cep` is accepted as an alias for `postal_code`.
///
/// # Errors
///
/// Returns 400 for missing or invalid fields and unknown postal codes.
/// Returns 409 if the postal code is already registered.
/// Returns 422 if the postal code has no usable coordinates.
/// Returns 502 if a lookup service is unavailable.
pub async fn create_store_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateStoreRequest>,
) -> Result<(StatusCode, Json<StoreItem>), AppError> {
    payload.validate()?;

    let name = payload.name.unwrap_or_default();
    let postal_code = payload.postal_code.unwrap_or_default();

    let store = state
        .store_service
        .create_store(&name, &postal_code)
        .await?;

    Ok((StatusCode::CREATED, Json(store.into())))
}

/// Lists all stores in insertion order.
///
/// # Endpoint
///
/// `GET /api/stores`
pub async fn store_list_handler(
    State(state): State<AppState>,
) -> Result<Json<StoreListResponse>, AppError> {
    let stores = state.store_service.list_stores().await?;

    Ok(Json(StoreListResponse {
        total: stores.len(),
        items: stores.into_iter().map(StoreItem::from).collect(),
    }))
}

/// Returns a single store.
///
/// # Endpoint
///
/// `GET /api/stores/{id}`
///
/// # Errors
///
/// Returns 404 if the store does not exist.
pub async fn get_store_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<StoreItem>, AppError> {
    let store = state.store_service.get_store(id).await?;
    Ok(Json(store.into()))
}

/// Renames a store and/or changes its postal code.
///
/// # Endpoint
///
/// `PATCH /api/stores/{id}`
///
/// A new postal code re-runs enrichment; address and coordinates are replaced
/// together. Address and coordinate fields in the body are rejected.
///
/// # Errors
///
/// Returns 400 for invalid input or protected fields.
/// Returns 404 if the store does not exist.
/// Returns 409, 422 or 502 as for creation.
pub async fn update_store_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateStoreRequest>,
) -> Result<Json<StoreItem>, AppError> {
    payload.ensure_no_protected_fields()?;

    let store = state
        .store_service
        .update_store(id, payload.name.as_deref(), payload.postal_code.as_deref())
        .await?;

    Ok(Json(store.into()))
}

/// Deletes a store and returns it.
///
/// # Endpoint
///
/// `DELETE /api/stores/{id}`
///
/// # Errors
///
/// Returns 404 if the store does not exist.
pub async fn delete_store_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<StoreItem>, AppError> {
    let store = state.store_service.delete_store(id).await?;
    Ok(Json(store.into()))
}
