//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx.
//!
//! # Repositories
//!
//! - [`PgStoreRepository`] - Store storage and retrieval

pub mod pg_store_repository;

pub use pg_store_repository::PgStoreRepository;
