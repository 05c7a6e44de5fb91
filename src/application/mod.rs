//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! lookups, validation and business rules. Services consume repository and
//! resolver traits and provide a clean API for HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::location_enricher::LocationEnricher`] - Postal code to address and coordinate
//! - [`services::store_service::StoreService`] - Store management and proximity search

pub mod services;
