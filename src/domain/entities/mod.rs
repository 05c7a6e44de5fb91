//! Core domain entities representing the business data model.
//!
//! # Entity Types
//!
//! - [`Store`] - A persisted retail location
//! - [`Address`] / [`Location`] - Data resolved from a postal code
//!
//! # Design Pattern
//!
//! Separate structs describe writes:
//! - `NewStore` - For inserting an already enriched store
//! - `StorePatch` - For partial updates; a postal code change travels with its
//!   [`Relocation`] so address and coordinate can only be replaced together

pub mod location;
pub mod store;

pub use location::{Address, Location};
pub use store::{NewStore, Relocation, Store, StorePatch};
