//! API route configuration.

use crate::api::handlers::{
    closest_store_handler, create_store_handler, delete_store_handler, get_store_handler,
    store_list_handler, stores_near_handler, update_store_handler,
};
use crate::state::AppState;
use axum::{Router, routing::get};

/// Store management and proximity search routes.
///
/// # Endpoints
///
/// - `GET    /stores`               - List all stores
/// - `POST   /stores`               - Register a store from name and postal code
/// - `GET    /stores/{id}`          - Fetch a store
/// - `PATCH  /stores/{id}`          - Rename and/or relocate a store
/// - `DELETE /stores/{id}`          - Delete a store
/// - `GET    /stores/near/{cep}`    - Stores within the search radius
/// - `GET    /stores/closest/{cep}` - Closest store within the search radius
pub fn store_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/stores",
            get(store_list_handler).post(create_store_handler),
        )
        .route(
            "/stores/{id}",
            get(get_store_handler)
                .patch(update_store_handler)
                .delete(delete_store_handler),
        )
        .route("/stores/near/{cep}", get(stores_near_handler))
        .route("/stores/closest/{cep}", get(closest_store_handler))
}
