//! HTTP clients for the external postal-code lookups.
//!
//! - [`ViaCepClient`] - [`AddressResolver`](crate::domain::resolvers::AddressResolver) backed by ViaCEP
//! - [`OpenCageClient`] - [`CoordinateResolver`](crate::domain::resolvers::CoordinateResolver) backed by OpenCage
//!
//! Both clients make exactly one request per call. The only time limit is the
//! client timeout passed at construction; transport failures and unreadable
//! payloads become [`LocationError::LookupUnavailable`].

mod opencage;
mod viacep;

pub use opencage::{DEFAULT_BASE_URL as OPENCAGE_DEFAULT_BASE_URL, OpenCageClient};
pub use viacep::{DEFAULT_BASE_URL as VIACEP_DEFAULT_BASE_URL, ViaCepClient};

use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::domain::resolvers::LocationError;

const CONNECT_TIMEOUT_SECS: u64 = 5;

fn build_client(service: &'static str, timeout_secs: u64) -> Result<Client, LocationError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS.min(timeout_secs)))
        .user_agent(concat!("store-locator/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| LocationError::unavailable(service, e))
}

/// Parses `base_url`, forcing exactly one trailing slash so that relative
/// joins append to the path instead of replacing its last segment.
fn parse_base_url(service: &'static str, base_url: &str) -> Result<Url, LocationError> {
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&normalised).map_err(|e| {
        LocationError::unavailable(service, format!("invalid base URL '{base_url}': {e}"))
    })
}
