//! Ports for the two external postal-code lookups.
//!
//! The application layer only sees these traits. HTTP implementations live in
//! [`crate::infrastructure::lookup`]; unit tests use the generated mocks.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::Address;
use crate::domain::geo::Coordinate;
use crate::domain::postal_code::PostalCode;

/// Failures while resolving a postal code to an address or coordinate.
#[derive(Debug, Error)]
pub enum LocationError {
    /// The address service does not know the code or considers it malformed.
    #[error("postal code {postal_code} does not exist")]
    InvalidPostalCode { postal_code: String },

    /// The geocoder returned an empty result set.
    #[error("no coordinates found for postal code {postal_code}")]
    NoCoordinatesFound { postal_code: String },

    /// The geocoder answered, but with a zeroed or non-finite position.
    #[error("could not resolve coordinates for postal code {postal_code}")]
    CoordinateResolutionFailed { postal_code: String },

    /// Transport failure, timeout, unexpected status or unparsable body.
    #[error("{service} lookup unavailable: {reason}")]
    LookupUnavailable {
        service: &'static str,
        reason: String,
    },
}

impl LocationError {
    pub fn unavailable(service: &'static str, reason: impl ToString) -> Self {
        Self::LookupUnavailable {
            service,
            reason: reason.to_string(),
        }
    }
}

/// Resolves a postal code to a postal address.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AddressResolver: Send + Sync {
    /// # Errors
    ///
    /// Returns [`LocationError::InvalidPostalCode`] if the code is unknown and
    /// [`LocationError::LookupUnavailable`] if the service cannot be reached
    /// or answers with something unusable.
    async fn resolve(&self, postal_code: &PostalCode) -> Result<Address, LocationError>;
}

/// Resolves a postal code to a latitude/longitude pair.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CoordinateResolver: Send + Sync {
    /// # Errors
    ///
    /// Returns [`LocationError::NoCoordinatesFound`] on an empty result set and
    /// [`LocationError::LookupUnavailable`] on transport or parse failures.
    async fn resolve(&self, postal_code: &PostalCode) -> Result<Coordinate, LocationError>;
}
