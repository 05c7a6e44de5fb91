//! Shared application state injected into handlers.

use std::sync::Arc;

use crate::application::services::StoreService;
use crate::infrastructure::persistence::PgStoreRepository;

#[derive(Clone)]
pub struct AppState {
    pub store_service: Arc<StoreService<PgStoreRepository>>,
}

impl AppState {
    pub fn new(store_service: StoreService<PgStoreRepository>) -> Self {
        Self {
            store_service: Arc::new(store_service),
        }
    }
}
