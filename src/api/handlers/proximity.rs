//! Handlers for proximity search.

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::json;

use crate::api::dto::proximity::{NearbyStoreItem, NearbyStoresResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Lists stores within the search radius of a postal code.
///
/// # Endpoint
///
/// `GET /api/stores/near/{cep}`
///
/// A store registered under `{cep}` itself is never listed. No match is a
/// normal answer: `200` with an empty `items` array.
///
/// # Errors
///
/// Returns 400 for malformed or unknown postal codes, 422/502 on lookup failures.
pub async fn stores_near_handler(
    Path(cep): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<NearbyStoresResponse>, AppError> {
    let result = state.store_service.stores_near(&cep).await?;
    Ok(Json(result.into()))
}

/// Returns the closest store within the search radius.
///
/// # Endpoint
///
/// `GET /api/stores/closest/{cep}`
///
/// # Errors
///
/// Returns 404 when no store lies within the radius, otherwise as
/// [`stores_near_handler`].
pub async fn closest_store_handler(
    Path(cep): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<NearbyStoreItem>, AppError> {
    let closest = state.store_service.closest_store(&cep).await?;

    closest.map(|found| Json(found.into())).ok_or_else(|| {
        AppError::not_found(
            "No store within search radius",
            json!({
                "postal_code": cep.trim(),
                "radius_km": state.store_service.radius_km(),
            }),
        )
    })
}
