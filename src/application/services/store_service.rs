//! Store management and proximity search service.

use std::sync::Arc;

use crate::application::services::LocationEnricher;
use crate::domain::entities::{NewStore, Relocation, Store, StorePatch};
use crate::domain::geo::Coordinate;
use crate::domain::postal_code::PostalCode;
use crate::domain::proximity::{DEFAULT_RADIUS_KM, Nearby, ProximityQuery};
use crate::domain::repositories::StoreRepository;
use crate::error::AppError;
use serde_json::json;

pub const NAME_MIN_CHARS: usize = 3;
pub const NAME_MAX_CHARS: usize = 20;

/// Result of a radius query.
#[derive(Debug, Clone)]
pub struct NearbyStores {
    pub postal_code: PostalCode,
    pub radius_km: f64,
    pub stores: Vec<Nearby<Store>>,
}

/// Service for store CRUD and proximity queries.
///
/// Guarantees that a store is only persisted after its postal code has been
/// fully enriched, and that a failed update leaves the stored record as it was.
pub struct StoreService<R: StoreRepository> {
    repository: Arc<R>,
    enricher: LocationEnricher,
    radius_km: f64,
}

impl<R: StoreRepository> StoreService<R> {
    /// Creates a new store service using the default search radius.
    pub fn new(repository: Arc<R>, enricher: LocationEnricher) -> Self {
        Self {
            repository,
            enricher,
            radius_km: DEFAULT_RADIUS_KM,
        }
    }

    pub fn with_radius(mut self, radius_km: f64) -> Self {
        self.radius_km = radius_km;
        self
    }

    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }

    /// Creates and enriches a new store.
    ///
    /// # Validation
    ///
    /// - Name: 3-20 characters after trimming
    /// - Postal code: 8 digits, optionally written `NNNNN-NNN`
    /// - Postal code not yet used by another store
    ///
    /// Input is validated before any lookup is made.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for invalid input or an unknown postal code.
    /// Returns [`AppError::Conflict`] if the postal code is already registered.
    /// Returns [`AppError::Unprocessable`] / [`AppError::BadGateway`] on lookup failures.
    pub async fn create_store(&self, name: &str, postal_code: &str) -> Result<Store, AppError> {
        let name = validate_store_name(name)?;
        let postal_code = PostalCode::parse(postal_code)?;

        self.ensure_postal_code_free(&postal_code, None).await?;

        let location = self.enricher.enrich(&postal_code).await?;

        let store = self
            .repository
            .create(NewStore {
                name,
                postal_code,
                location,
            })
            .await?;

        tracing::info!(store_id = store.id, postal_code = %store.postal_code, "store created");
        Ok(store)
    }

    /// Lists every store in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn list_stores(&self) -> Result<Vec<Store>, AppError> {
        self.repository.find_all().await
    }

    /// Retrieves a store by ID.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the store does not exist.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn get_store(&self, id: i64) -> Result<Store, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| store_not_found(id))
    }

    /// Renames a store and/or moves it to another postal code.
    ///
    /// A new postal code is fully enriched before anything is written; an
    /// unchanged postal code does not trigger a lookup.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the store does not exist.
    /// Returns [`AppError::Validation`] for invalid input.
    /// Returns [`AppError::Conflict`] if another store uses the new postal code.
    /// Returns lookup errors as in [`Self::create_store`].
    pub async fn update_store(
        &self,
        id: i64,
        name: Option<&str>,
        postal_code: Option<&str>,
    ) -> Result<Store, AppError> {
        let name = name.map(validate_store_name).transpose()?;
        let postal_code = postal_code.map(PostalCode::parse).transpose()?;

        let current = self.get_store(id).await?;

        let relocation = match postal_code {
            Some(code) if code != current.postal_code => {
                self.ensure_postal_code_free(&code, Some(id)).await?;
                let location = self.enricher.enrich(&code).await?;
                Some(Relocation {
                    postal_code: code,
                    location,
                })
            }
            _ => None,
        };

        let patch = StorePatch { name, relocation };
        if patch.is_empty() {
            return Ok(current);
        }

        let updated = self
            .repository
            .update(id, patch)
            .await?
            .ok_or_else(|| store_not_found(id))?;

        tracing::info!(store_id = id, postal_code = %updated.postal_code, "store updated");
        Ok(updated)
    }

    /// Deletes a store and returns the removed record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the store does not exist.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn delete_store(&self, id: i64) -> Result<Store, AppError> {
        let deleted = self
            .repository
            .delete(id)
            .await?
            .ok_or_else(|| store_not_found(id))?;

        tracing::info!(store_id = id, "store deleted");
        Ok(deleted)
    }

    /// Counts stored records.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn count_stores(&self) -> Result<i64, AppError> {
        self.repository.count().await
    }

    /// Finds every other store within the search radius of `postal_code`.
    ///
    /// Stores keep their insertion order. An empty list is a valid answer.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a malformed or unknown postal code.
    /// Returns lookup and database errors as they occur.
    pub async fn stores_near(&self, postal_code: &str) -> Result<NearbyStores, AppError> {
        let postal_code = PostalCode::parse(postal_code)?;
        let (query_target, stores) = self.snapshot(&postal_code).await?;

        let found = ProximityQuery::new(query_target)
            .with_radius(self.radius_km)
            .excluding(&postal_code)
            .within_radius(stores);

        tracing::info!(
            postal_code = %postal_code,
            radius_km = self.radius_km,
            found = found.len(),
            "radius search finished"
        );

        Ok(NearbyStores {
            postal_code,
            radius_km: self.radius_km,
            stores: found,
        })
    }

    /// Finds the single closest other store within the search radius.
    ///
    /// Returns `Ok(None)` when no store qualifies.
    ///
    /// # Errors
    ///
    /// See [`Self::stores_near`].
    pub async fn closest_store(
        &self,
        postal_code: &str,
    ) -> Result<Option<Nearby<Store>>, AppError> {
        let postal_code = PostalCode::parse(postal_code)?;
        let (query_target, stores) = self.snapshot(&postal_code).await?;

        let closest = ProximityQuery::new(query_target)
            .with_radius(self.radius_km)
            .excluding(&postal_code)
            .closest(stores);

        match &closest {
            Some(found) => tracing::info!(
                postal_code = %postal_code,
                store_id = found.item.id,
                distance_km = format!("{:.2}", found.distance_km),
                "closest store found"
            ),
            None => tracing::info!(
                postal_code = %postal_code,
                radius_km = self.radius_km,
                "no store within radius"
            ),
        }

        Ok(closest)
    }

    /// Resolves the query coordinate, then loads the current store set.
    async fn snapshot(
        &self,
        postal_code: &PostalCode,
    ) -> Result<(Coordinate, Vec<Store>), AppError> {
        let target = self.enricher.locate(postal_code).await?;
        let stores = self.repository.find_all().await?;

        tracing::debug!(
            postal_code = %postal_code,
            stores = stores.len(),
            "loaded stores for proximity search"
        );

        Ok((target, stores))
    }

    /// Fails with a conflict if a store other than `owner` uses `postal_code`.
    async fn ensure_postal_code_free(
        &self,
        postal_code: &PostalCode,
        owner: Option<i64>,
    ) -> Result<(), AppError> {
        match self.repository.find_by_postal_code(postal_code).await? {
            Some(existing) if Some(existing.id) != owner => Err(AppError::conflict(
                "Postal code already registered",
                json!({ "postal_code": postal_code, "store_id": existing.id }),
            )),
            _ => Ok(()),
        }
    }
}

/// Trims and validates a store name.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if the trimmed name has fewer than 3 or
/// more than 20 characters.
pub fn validate_store_name(name: &str) -> Result<String, AppError> {
    let trimmed = name.trim();
    let len = trimmed.chars().count();

    if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&len) {
        return Err(AppError::bad_request(
            "Invalid store name length",
            json!({ "min": NAME_MIN_CHARS, "max": NAME_MAX_CHARS, "actual": len }),
        ));
    }

    Ok(trimmed.to_string())
}

fn store_not_found(id: i64) -> AppError {
    AppError::not_found("Store not found", json!({ "id": id }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Address, Location};
    use crate::domain::repositories::MockStoreRepository;
    use crate::domain::resolvers::{LocationError, MockAddressResolver, MockCoordinateResolver};
    use chrono::Utc;

    fn address(city: &str) -> Address {
        Address {
            street: None,
            neighborhood: None,
            city: Some(city.to_string()),
            state: Some("São Paulo".to_string()),
        }
    }

    fn test_store(id: i64, code: &str, lat: f64, lng: f64) -> Store {
        Store::new(
            id,
            format!("Store {id}"),
            PostalCode::parse(code).unwrap(),
            Location::new(address("Somewhere"), Coordinate::new(lat, lng)),
            Utc::now(),
            Utc::now(),
        )
    }

    /// Enricher that resolves every code to `at`.
    fn enricher_at(at: Coordinate) -> LocationEnricher {
        let mut addresses = MockAddressResolver::new();
        addresses.expect_resolve().returning(|_| Ok(address("Resolved")));
        let mut coordinates = MockCoordinateResolver::new();
        coordinates.expect_resolve().returning(move |_| Ok(at));
        LocationEnricher::new(Arc::new(addresses), Arc::new(coordinates))
    }

    /// Enricher that must never be used.
    fn idle_enricher() -> LocationEnricher {
        let mut addresses = MockAddressResolver::new();
        addresses.expect_resolve().never();
        let mut coordinates = MockCoordinateResolver::new();
        coordinates.expect_resolve().never();
        LocationEnricher::new(Arc::new(addresses), Arc::new(coordinates))
    }

    fn service(
        repo: MockStoreRepository,
        enricher: LocationEnricher,
    ) -> StoreService<MockStoreRepository> {
        StoreService::new(Arc::new(repo), enricher)
    }

    #[tokio::test]
    async fn test_create_store_success() {
        let mut repo = MockStoreRepository::new();
        repo.expect_find_by_postal_code()
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_create()
            .withf(|new| {
                new.name == "Paulista"
                    && new.postal_code.as_str() == "01310100"
                    && new.location.coordinate == Coordinate::new(-23.56, -46.65)
            })
            .times(1)
            .returning(|new| {
                Ok(Store::new(
                    1,
                    new.name,
                    new.postal_code,
                    new.location,
                    Utc::now(),
                    Utc::now(),
                ))
            });

        let svc = service(repo, enricher_at(Coordinate::new(-23.56, -46.65)));

        let store = svc.create_store("  Paulista ", "01310-100").await.unwrap();

        assert_eq!(store.id, 1);
        assert_eq!(store.name, "Paulista");
        assert_eq!(store.address.city.as_deref(), Some("Resolved"));
    }

    #[tokio::test]
    async fn test_create_store_rejects_malformed_postal_code_before_lookup() {
        let mut repo = MockStoreRepository::new();
        repo.expect_find_by_postal_code().never();
        repo.expect_create().never();

        let svc = service(repo, idle_enricher());

        for raw in ["1234", "abcdefgh"] {
            let result = svc.create_store("Paulista", raw).await;
            assert!(matches!(result, Err(AppError::Validation { .. })));
        }
    }

    #[tokio::test]
    async fn test_create_store_rejects_bad_name() {
        let mut repo = MockStoreRepository::new();
        repo.expect_create().never();

        let svc = service(repo, idle_enricher());

        for name in ["", "  ab  ", "a name that is way too long"] {
            let result = svc.create_store(name, "01310100").await;
            assert!(matches!(result, Err(AppError::Validation { .. })));
        }
    }

    #[tokio::test]
    async fn test_create_store_duplicate_postal_code() {
        let mut repo = MockStoreRepository::new();
        repo.expect_find_by_postal_code()
            .times(1)
            .returning(|_| Ok(Some(test_store(9, "01310100", -23.5, -46.6))));
        repo.expect_create().never();

        let svc = service(repo, idle_enricher());

        let result = svc.create_store("Paulista", "01310100").await;

        assert!(matches!(result, Err(AppError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_create_store_not_persisted_when_enrichment_fails() {
        let mut repo = MockStoreRepository::new();
        repo.expect_find_by_postal_code().returning(|_| Ok(None));
        repo.expect_create().never();

        let mut addresses = MockAddressResolver::new();
        addresses.expect_resolve().returning(|c| {
            Err(LocationError::InvalidPostalCode {
                postal_code: c.to_string(),
            })
        });
        let mut coordinates = MockCoordinateResolver::new();
        coordinates.expect_resolve().never();
        let enricher = LocationEnricher::new(Arc::new(addresses), Arc::new(coordinates));

        let svc = service(repo, enricher);

        let result = svc.create_store("Paulista", "99999999").await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_get_store_not_found() {
        let mut repo = MockStoreRepository::new();
        repo.expect_find_by_id().times(1).returning(|_| Ok(None));

        let svc = service(repo, idle_enricher());

        let result = svc.get_store(42).await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_store_rename_only_skips_lookup() {
        let mut repo = MockStoreRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(test_store(id, "01310100", -23.5, -46.6))));
        repo.expect_update()
            .withf(|id, patch| {
                *id == 1 && patch.name.as_deref() == Some("Centro") && patch.relocation.is_none()
            })
            .times(1)
            .returning(|id, patch| {
                let mut store = test_store(id, "01310100", -23.5, -46.6);
                store.name = patch.name.unwrap();
                Ok(Some(store))
            });

        let svc = service(repo, idle_enricher());

        // Same postal code in another spelling is not a change.
        let store = svc
            .update_store(1, Some("Centro"), Some("01310-100"))
            .await
            .unwrap();

        assert_eq!(store.name, "Centro");
    }

    #[tokio::test]
    async fn test_update_store_new_postal_code_replaces_location() {
        let mut repo = MockStoreRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(test_store(id, "01310100", -23.5, -46.6))));
        repo.expect_find_by_postal_code().returning(|_| Ok(None));
        repo.expect_update()
            .withf(|_, patch| {
                patch.name.is_none()
                    && patch.relocation.as_ref().is_some_and(|r| {
                        r.postal_code.as_str() == "20040002"
                            && r.location.coordinate == Coordinate::new(-22.9, -43.17)
                            && r.location.address.city.as_deref() == Some("Resolved")
                    })
            })
            .times(1)
            .returning(|id, patch| {
                let relocation = patch.relocation.unwrap();
                Ok(Some(Store::new(
                    id,
                    "Store".to_string(),
                    relocation.postal_code,
                    relocation.location,
                    Utc::now(),
                    Utc::now(),
                )))
            });

        let svc = service(repo, enricher_at(Coordinate::new(-22.9, -43.17)));

        let store = svc.update_store(1, None, Some("20040-002")).await.unwrap();

        assert_eq!(store.postal_code.as_str(), "20040002");
    }

    #[tokio::test]
    async fn test_update_store_failed_enrichment_writes_nothing() {
        let mut repo = MockStoreRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(test_store(id, "01310100", -23.5, -46.6))));
        repo.expect_find_by_postal_code().returning(|_| Ok(None));
        repo.expect_update().never();

        let svc = service(repo, enricher_at(Coordinate::new(0.0, 0.0)));

        let result = svc
            .update_store(1, Some("Centro"), Some("20040002"))
            .await;

        assert!(matches!(result, Err(AppError::Unprocessable { .. })));
    }

    #[tokio::test]
    async fn test_update_store_postal_code_taken_by_other_store() {
        let mut repo = MockStoreRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(test_store(id, "01310100", -23.5, -46.6))));
        repo.expect_find_by_postal_code()
            .returning(|_| Ok(Some(test_store(2, "20040002", -22.9, -43.17))));
        repo.expect_update().never();

        let svc = service(repo, idle_enricher());

        let result = svc.update_store(1, None, Some("20040002")).await;

        assert!(matches!(result, Err(AppError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_update_store_not_found() {
        let mut repo = MockStoreRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));
        repo.expect_update().never();

        let svc = service(repo, idle_enricher());

        let result = svc.update_store(5, Some("Centro"), None).await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_store_not_found() {
        let mut repo = MockStoreRepository::new();
        repo.expect_delete().times(1).returning(|_| Ok(None));

        let svc = service(repo, idle_enricher());

        assert!(matches!(
            svc.delete_store(3).await,
            Err(AppError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_stores_near_unresolvable_query_position() {
        let mut repo = MockStoreRepository::new();
        repo.expect_find_all().never();

        let svc = service(repo, enricher_at(Coordinate::new(0.0, 0.0)));

        let result = svc.stores_near("11111111").await;

        assert!(matches!(result, Err(AppError::Unprocessable { .. })));
    }

    #[tokio::test]
    async fn test_stores_near_returns_stores_in_radius() {
        let mut repo = MockStoreRepository::new();
        repo.expect_find_all().times(1).returning(|| {
            Ok(vec![
                test_store(1, "01310100", -23.5614, -46.6559),
                test_store(2, "01001000", -23.5505, -46.6333),
                test_store(3, "20040002", -22.9068, -43.1729),
                test_store(4, "09010000", -23.6639, -46.5383),
            ])
        });

        let svc = service(repo, enricher_at(Coordinate::new(-23.5614, -46.6559)));

        let result = svc.stores_near("01310-100").await.unwrap();

        let ids: Vec<i64> = result.stores.iter().map(|n| n.item.id).collect();
        assert_eq!(ids, vec![2, 4]);
        assert_eq!(result.postal_code.as_str(), "01310100");
        assert_eq!(result.radius_km, DEFAULT_RADIUS_KM);
    }

    #[tokio::test]
    async fn test_closest_store_picks_nearest_other_store() {
        let mut repo = MockStoreRepository::new();
        repo.expect_find_all().times(1).returning(|| {
            Ok(vec![
                test_store(1, "01310100", -23.5614, -46.6559),
                test_store(4, "09010000", -23.6639, -46.5383),
                test_store(2, "01001000", -23.5505, -46.6333),
            ])
        });

        let svc = service(repo, enricher_at(Coordinate::new(-23.5614, -46.6559)));

        let closest = svc.closest_store("01310100").await.unwrap().unwrap();

        assert_eq!(closest.item.id, 2);
        assert!(closest.distance_km < 3.0);
    }

    #[tokio::test]
    async fn test_closest_store_none_within_radius() {
        let mut repo = MockStoreRepository::new();
        repo.expect_find_all()
            .returning(|| Ok(vec![test_store(3, "20040002", -22.9068, -43.1729)]));

        let svc = service(repo, enricher_at(Coordinate::new(-23.5614, -46.6559)));

        assert!(svc.closest_store("01310100").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_custom_radius_widens_search() {
        let mut repo = MockStoreRepository::new();
        repo.expect_find_all()
            .returning(|| Ok(vec![test_store(3, "20040002", -22.9068, -43.1729)]));

        let svc =
            service(repo, enricher_at(Coordinate::new(-23.5614, -46.6559))).with_radius(500.0);

        let result = svc.stores_near("01310100").await.unwrap();

        assert_eq!(result.stores.len(), 1);
        assert_eq!(result.radius_km, 500.0);
    }

    #[tokio::test]
    async fn test_proximity_rejects_malformed_postal_code_before_lookup() {
        let mut repo = MockStoreRepository::new();
        repo.expect_find_all().never();

        let svc = service(repo, idle_enricher());

        assert!(matches!(
            svc.stores_near("1234").await,
            Err(AppError::Validation { .. })
        ));
        assert!(matches!(
            svc.closest_store("abcdefgh").await,
            Err(AppError::Validation { .. })
        ));
    }

    #[test]
    fn test_validate_store_name_counts_characters() {
        assert_eq!(validate_store_name(" Café ").unwrap(), "Café");
        assert!(validate_store_name("ab").is_err());
        assert!(validate_store_name("abc").is_ok());
        assert!(validate_store_name("12345678901234567890").is_ok());
        assert!(validate_store_name("123456789012345678901").is_err());
    }
}
