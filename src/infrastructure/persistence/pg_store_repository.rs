//! PostgreSQL implementation of store repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Address, Location, NewStore, Store, StorePatch};
use crate::domain::geo::Coordinate;
use crate::domain::postal_code::PostalCode;
use crate::domain::repositories::StoreRepository;
use crate::error::AppError;

struct StoreRow {
    id: i64,
    name: String,
    postal_code: String,
    street: Option<String>,
    neighborhood: Option<String>,
    city: Option<String>,
    state: Option<String>,
    latitude: f64,
    longitude: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<StoreRow> for Store {
    type Error = AppError;

    fn try_from(row: StoreRow) -> Result<Self, Self::Error> {
        let postal_code = PostalCode::parse(&row.postal_code).map_err(|e| {
            AppError::internal(
                "Corrupt postal code in storage",
                json!({ "id": row.id, "reason": e.to_string() }),
            )
        })?;

        let location = Location::new(
            Address {
                street: row.street,
                neighborhood: row.neighborhood,
                city: row.city,
                state: row.state,
            },
            Coordinate::new(row.latitude, row.longitude),
        );

        Ok(Store::new(
            row.id,
            row.name,
            postal_code,
            location,
            row.created_at,
            row.updated_at,
        ))
    }
}

/// PostgreSQL repository for store records.
///
/// Postal code uniqueness is enforced by the `stores_postal_code_key`
/// constraint; violations surface as [`AppError::Conflict`].
pub struct PgStoreRepository {
    pool: Arc<PgPool>,
}

impl PgStoreRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StoreRepository for PgStoreRepository {
    async fn find_all(&self) -> Result<Vec<Store>, AppError> {
        let rows = sqlx::query_as!(
            StoreRow,
            r#"
            SELECT id, name, postal_code, street, neighborhood, city, state,
                   latitude, longitude, created_at, updated_at
            FROM stores
            ORDER BY id
            "#
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.into_iter().map(Store::try_from).collect()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Store>, AppError> {
        let row = sqlx::query_as!(
            StoreRow,
            r#"
            SELECT id, name, postal_code, street, neighborhood, city, state,
                   latitude, longitude, created_at, updated_at
            FROM stores
            WHERE id = $1
            "#,
            id
        )
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Store::try_from).transpose()
    }

    async fn find_by_postal_code(
        &self,
        postal_code: &PostalCode,
    ) -> Result<Option<Store>, AppError> {
        let row = sqlx::query_as!(
            StoreRow,
            r#"
            SELECT id, name, postal_code, street, neighborhood, city, state,
                   latitude, longitude, created_at, updated_at
            FROM stores
            WHERE postal_code = $1
            "#,
            postal_code.as_str()
        )
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Store::try_from).transpose()
    }

    async fn create(&self, new_store: NewStore) -> Result<Store, AppError> {
        let NewStore {
            name,
            postal_code,
            location,
        } = new_store;

        let row = sqlx::query_as!(
            StoreRow,
            r#"
            INSERT INTO stores
                (name, postal_code, street, neighborhood, city, state, latitude, longitude)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, name, postal_code, street, neighborhood, city, state,
                      latitude, longitude, created_at, updated_at
            "#,
            name,
            postal_code.as_str(),
            location.address.street,
            location.address.neighborhood,
            location.address.city,
            location.address.state,
            location.coordinate.latitude,
            location.coordinate.longitude
        )
        .fetch_one(self.pool.as_ref())
        .await?;

        Store::try_from(row)
    }

    async fn update(&self, id: i64, patch: StorePatch) -> Result<Option<Store>, AppError> {
        let relocate = patch.relocation.is_some();
        let (postal_code, address, coordinate) = match patch.relocation {
            Some(r) => (
                Some(r.postal_code.into_inner()),
                r.location.address,
                Some(r.location.coordinate),
            ),
            None => (None, Address::default(), None),
        };

        // Address and coordinate columns are replaced together or not at all.
        let row = sqlx::query_as!(
            StoreRow,
            r#"
            UPDATE stores SET
                name         = COALESCE($2::TEXT, name),
                postal_code  = CASE WHEN $3::BOOLEAN THEN $4::TEXT ELSE postal_code END,
                street       = CASE WHEN $3::BOOLEAN THEN $5::TEXT ELSE street END,
                neighborhood = CASE WHEN $3::BOOLEAN THEN $6::TEXT ELSE neighborhood END,
                city         = CASE WHEN $3::BOOLEAN THEN $7::TEXT ELSE city END,
                state        = CASE WHEN $3::BOOLEAN THEN $8::TEXT ELSE state END,
                latitude     = CASE WHEN $3::BOOLEAN THEN $9::DOUBLE PRECISION ELSE latitude END,
                longitude    = CASE WHEN $3::BOOLEAN THEN $10::DOUBLE PRECISION ELSE longitude END,
                updated_at   = NOW()
            WHERE id = $1
            RETURNING id, name, postal_code, street, neighborhood, city, state,
                      latitude, longitude, created_at, updated_at
            "#,
            id,
            patch.name,
            relocate,
            postal_code,
            address.street,
            address.neighborhood,
            address.city,
            address.state,
            coordinate.map(|c| c.latitude),
            coordinate.map(|c| c.longitude)
        )
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Store::try_from).transpose()
    }

    async fn delete(&self, id: i64) -> Result<Option<Store>, AppError> {
        let row = sqlx::query_as!(
            StoreRow,
            r#"
            DELETE FROM stores
            WHERE id = $1
            RETURNING id, name, postal_code, street, neighborhood, city, state,
                      latitude, longitude, created_at, updated_at
            "#,
            id
        )
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Store::try_from).transpose()
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar!("SELECT COUNT(*) FROM stores")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count.unwrap_or(0))
    }
}
