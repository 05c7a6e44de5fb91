//! Domain layer containing business entities and logic.
//!
//! Everything here is independent of HTTP, SQL and the concrete lookup
//! services.
//!
//! # Architecture
//!
//! - [`entities`] - Store, address and location data structures
//! - [`postal_code`] - Postal code normalization
//! - [`geo`] - Coordinates and haversine distance
//! - [`proximity`] - Radius and closest-match queries
//! - [`repositories`] - Data access trait definitions
//! - [`resolvers`] - Address and coordinate lookup ports
//!
//! # Proximity Query Flow
//!
//! 1. The query postal code is parsed into a [`postal_code::PostalCode`]
//! 2. It is enriched through the resolvers to obtain a target coordinate
//! 3. All stores are loaded via [`repositories::StoreRepository::find_all`]
//! 4. [`proximity::ProximityQuery`] scores and filters them

pub mod entities;
pub mod geo;
pub mod postal_code;
pub mod proximity;
pub mod repositories;
pub mod resolvers;
