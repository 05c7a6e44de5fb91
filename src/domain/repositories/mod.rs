//! Repository trait definitions for the domain layer.
//!
//! Traits define the contract for data operations; implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated
//! via `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`StoreRepository`] - Store CRUD operations
//!
//! # Testing
//!
//! See integration tests in `tests/repository_store.rs` for usage examples.

pub mod store_repository;

pub use store_repository::StoreRepository;

#[cfg(test)]
pub use store_repository::MockStoreRepository;
