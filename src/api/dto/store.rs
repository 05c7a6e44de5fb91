//! DTOs for store management endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Value, json};
use validator::Validate;

use crate::domain::entities::Store;
use crate::error::AppError;

/// Request body for `POST /api/stores`.
///
/// Both fields are checked for presence here; content rules (name length,
/// postal code format) belong to the service.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateStoreRequest {
    #[validate(required(message = "name is required"))]
    pub name: Option<String>,

    #[serde(alias = "cep")]
    #[validate(required(message = "postal_code is required"))]
    pub postal_code: Option<String>,
}

/// Request body for `PATCH /api/stores/{id}`.
///
/// Address and coordinate fields are derived from the postal code and cannot
/// be written. They are still deserialized so that a client sending them gets
/// a 400 instead of having them silently ignored. `null` counts as sent.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateStoreRequest {
    pub name: Option<String>,

    #[serde(alias = "cep")]
    pub postal_code: Option<String>,

    #[serde(default, alias = "rua", deserialize_with = "present")]
    pub street: Option<Value>,
    #[serde(default, alias = "bairro", deserialize_with = "present")]
    pub neighborhood: Option<Value>,
    #[serde(default, alias = "cidade", deserialize_with = "present")]
    pub city: Option<Value>,
    #[serde(default, alias = "estado", deserialize_with = "present")]
    pub state: Option<Value>,
    #[serde(default, alias = "lat", deserialize_with = "present")]
    pub latitude: Option<Value>,
    #[serde(default, alias = "lng", deserialize_with = "present")]
    pub longitude: Option<Value>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl UpdateStoreRequest {
    /// Names of derived fields present in the request.
    pub fn protected_fields(&self) -> Vec<&'static str> {
        [
            ("street", &self.street),
            ("neighborhood", &self.neighborhood),
            ("city", &self.city),
            ("state", &self.state),
            ("latitude", &self.latitude),
            ("longitude", &self.longitude),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.as_ref().map(|_| name))
        .collect()
    }

    /// Rejects the request if it tries to write a derived field.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] listing the offending fields.
    pub fn ensure_no_protected_fields(&self) -> Result<(), AppError> {
        let fields = self.protected_fields();
        if fields.is_empty() {
            return Ok(());
        }

        Err(AppError::bad_request(
            "Address and coordinates are derived from the postal code and cannot be set",
            json!({ "fields": fields }),
        ))
    }
}

/// Store representation returned by every store endpoint.
#[derive(Debug, Serialize)]
pub struct StoreItem {
    pub id: i64,
    pub name: String,
    pub postal_code: String,
    pub street: Option<String>,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Store> for StoreItem {
    fn from(store: Store) -> Self {
        Self {
            id: store.id,
            name: store.name,
            postal_code: store.postal_code.into_inner(),
            street: store.address.street,
            neighborhood: store.address.neighborhood,
            city: store.address.city,
            state: store.address.state,
            latitude: store.coordinate.latitude,
            longitude: store.coordinate.longitude,
            created_at: store.created_at,
            updated_at: store.updated_at,
        }
    }
}

/// Response for `GET /api/stores`.
#[derive(Debug, Serialize)]
pub struct StoreListResponse {
    pub items: Vec<StoreItem>,
    pub total: usize,
}
