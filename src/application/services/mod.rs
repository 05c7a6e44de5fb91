//! Business logic services for the application layer.

pub mod location_enricher;
pub mod store_service;

pub use location_enricher::LocationEnricher;
pub use store_service::{NearbyStores, StoreService};
