//! DTOs for proximity search endpoints.

use serde::Serialize;

use crate::api::dto::store::StoreItem;
use crate::application::services::NearbyStores;
use crate::domain::entities::Store;
use crate::domain::proximity::Nearby;

/// A store and its distance from the queried postal code.
#[derive(Debug, Serialize)]
pub struct NearbyStoreItem {
    pub store: StoreItem,
    /// Kilometres, rounded to two decimals.
    pub distance_km: f64,
}

impl From<Nearby<Store>> for NearbyStoreItem {
    fn from(nearby: Nearby<Store>) -> Self {
        Self {
            store: nearby.item.into(),
            distance_km: round_km(nearby.distance_km),
        }
    }
}

/// Response for `GET /api/stores/near/{cep}`.
#[derive(Debug, Serialize)]
pub struct NearbyStoresResponse {
    pub postal_code: String,
    pub radius_km: f64,
    pub items: Vec<NearbyStoreItem>,
}

impl From<NearbyStores> for NearbyStoresResponse {
    fn from(result: NearbyStores) -> Self {
        Self {
            postal_code: result.postal_code.into_inner(),
            radius_km: result.radius_km,
            items: result.stores.into_iter().map(Into::into).collect(),
        }
    }
}

fn round_km(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}
