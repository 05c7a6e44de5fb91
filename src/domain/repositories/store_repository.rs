//! Repository trait for store data access.

use crate::domain::entities::{NewStore, Store, StorePatch};
use crate::domain::postal_code::PostalCode;
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for managing stores.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgStoreRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_store.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoreRepository: Send + Sync {
    /// Lists every store in insertion order.
    ///
    /// Proximity results inherit this order, so it must be stable.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_all(&self) -> Result<Vec<Store>, AppError>;

    /// Finds a store by its database ID.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<Store>, AppError>;

    /// Finds the store registered under a postal code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_postal_code(
        &self,
        postal_code: &PostalCode,
    ) -> Result<Option<Store>, AppError>;

    /// Inserts an enriched store.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the postal code is already taken.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_store: NewStore) -> Result<Store, AppError>;

    /// Applies a partial update in a single statement.
    ///
    /// Returns `Ok(None)` if no store has the given ID.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the new postal code is already taken.
    /// Returns [`AppError::Internal`] on database errors.
    async fn update(&self, id: i64, patch: StorePatch) -> Result<Option<Store>, AppError>;

    /// Deletes a store and returns the removed record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete(&self, id: i64) -> Result<Option<Store>, AppError>;

    /// Counts stored records.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count(&self) -> Result<i64, AppError>;
}
