//! OpenCage forward geocoding.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::{build_client, parse_base_url};
use crate::domain::geo::Coordinate;
use crate::domain::postal_code::PostalCode;
use crate::domain::resolvers::{CoordinateResolver, LocationError};

const SERVICE: &str = "opencage";
pub const DEFAULT_BASE_URL: &str = "https://api.opencagedata.com/geocode/v1";

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    lat: Option<f64>,
    lng: Option<f64>,
}

impl GeocodeResponse {
    /// Takes the first result; the geocoder ranks by confidence.
    fn into_coordinate(self, postal_code: &PostalCode) -> Result<Coordinate, LocationError> {
        let first = self
            .results
            .into_iter()
            .next()
            .ok_or_else(|| LocationError::NoCoordinatesFound {
                postal_code: postal_code.to_string(),
            })?;

        match first.geometry {
            Some(Geometry {
                lat: Some(lat),
                lng: Some(lng),
            }) => Ok(Coordinate::new(lat, lng)),
            _ => Err(LocationError::CoordinateResolutionFailed {
                postal_code: postal_code.to_string(),
            }),
        }
    }
}

/// Coordinate resolver backed by the OpenCage geocoding API.
///
/// The API key is sent as a query parameter and never logged.
pub struct OpenCageClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl OpenCageClient {
    /// Creates a client pointed at the public OpenCage endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::LookupUnavailable`] if the HTTP client cannot be built.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, LocationError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL, timeout_secs)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::LookupUnavailable`] if the HTTP client cannot be
    /// built or `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        base_url: &str,
        timeout_secs: u64,
    ) -> Result<Self, LocationError> {
        Ok(Self {
            client: build_client(SERVICE, timeout_secs)?,
            api_key: api_key.to_owned(),
            base_url: parse_base_url(SERVICE, base_url)?,
        })
    }

    fn geocode_url(&self, postal_code: &PostalCode) -> Result<Url, LocationError> {
        let mut url = self
            .base_url
            .join("json")
            .map_err(|e| LocationError::unavailable(SERVICE, e))?;

        url.query_pairs_mut()
            .append_pair("q", postal_code.as_str())
            .append_pair("countrycode", "br")
            .append_pair("key", &self.api_key)
            .append_pair("limit", "1")
            .append_pair("no_annotations", "1");

        Ok(url)
    }
}

#[async_trait]
impl CoordinateResolver for OpenCageClient {
    async fn resolve(&self, postal_code: &PostalCode) -> Result<Coordinate, LocationError> {
        let url = self.geocode_url(postal_code)?;
        tracing::debug!(postal_code = %postal_code, "requesting coordinates");

        // `without_url` keeps the API key out of error messages.
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LocationError::unavailable(SERVICE, e.without_url()))?
            .error_for_status()
            .map_err(|e| LocationError::unavailable(SERVICE, e.without_url()))?;

        let body: GeocodeResponse = response.json().await.map_err(|e| {
            LocationError::unavailable(SERVICE, format!("malformed body: {}", e.without_url()))
        })?;

        body.into_coordinate(postal_code)
    }
}
