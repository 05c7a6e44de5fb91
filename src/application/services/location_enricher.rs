//! Postal code enrichment: address first, then coordinates.

use std::sync::Arc;

use crate::domain::entities::Location;
use crate::domain::geo::Coordinate;
use crate::domain::postal_code::PostalCode;
use crate::domain::resolvers::{AddressResolver, CoordinateResolver, LocationError};

/// Resolves a postal code into a full, validated [`Location`].
///
/// This is the single path through which addresses and coordinates enter the
/// system. Store creation, postal code changes and proximity queries all go
/// through [`LocationEnricher::enrich`].
#[derive(Clone)]
pub struct LocationEnricher {
    addresses: Arc<dyn AddressResolver>,
    coordinates: Arc<dyn CoordinateResolver>,
}

impl LocationEnricher {
    pub fn new(
        addresses: Arc<dyn AddressResolver>,
        coordinates: Arc<dyn CoordinateResolver>,
    ) -> Self {
        Self {
            addresses,
            coordinates,
        }
    }

    /// Resolves the address, then the coordinate, of `postal_code`.
    ///
    /// The geocoder is not called when the address lookup fails.
    ///
    /// # Errors
    ///
    /// Propagates resolver errors unchanged. Returns
    /// [`LocationError::CoordinateResolutionFailed`] if the geocoder answers
    /// with a zeroed or non-finite position.
    pub async fn enrich(&self, postal_code: &PostalCode) -> Result<Location, LocationError> {
        let address = self.addresses.resolve(postal_code).await?;

        let coordinate = self.coordinates.resolve(postal_code).await?;
        if !coordinate.is_resolved() {
            tracing::warn!(
                postal_code = %postal_code,
                latitude = coordinate.latitude,
                longitude = coordinate.longitude,
                "geocoder returned an empty position"
            );
            return Err(LocationError::CoordinateResolutionFailed {
                postal_code: postal_code.to_string(),
            });
        }

        tracing::info!(
            postal_code = %postal_code,
            latitude = coordinate.latitude,
            longitude = coordinate.longitude,
            "postal code enriched"
        );

        Ok(Location::new(address, coordinate))
    }

    /// Resolves only the coordinate, with the same validation as [`Self::enrich`].
    ///
    /// # Errors
    ///
    /// See [`Self::enrich`].
    pub async fn locate(&self, postal_code: &PostalCode) -> Result<Coordinate, LocationError> {
        self.enrich(postal_code).await.map(|l| l.coordinate)
    }
}
