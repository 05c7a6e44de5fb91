//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod health;
pub mod proximity;
pub mod stores;

pub use health::health_handler;
pub use proximity::{closest_store_handler, stores_near_handler};
pub use stores::{
    create_store_handler, delete_store_handler, get_store_handler, store_list_handler,
    update_store_handler,
};
