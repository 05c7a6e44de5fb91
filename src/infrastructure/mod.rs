//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`lookup`] - HTTP clients for the address and geocoding services
//! - [`persistence`] - PostgreSQL repository implementations

pub mod lookup;
pub mod persistence;
