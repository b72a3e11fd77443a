pub mod auth;
pub mod favorites;
pub mod movies;
pub mod routes;

pub use routes::create_router;

use std::sync::Arc;

use crate::{auth::SessionKeys, services::catalog::Catalog, store::Store};

/// Shared application state
///
/// Explicitly constructed once at startup and injected into the router;
/// no ambient globals. Both seams are trait objects so tests can swap in
/// the memory store or a scripted catalog.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub catalog: Arc<dyn Catalog>,
    pub sessions: SessionKeys,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, catalog: Arc<dyn Catalog>, sessions: SessionKeys) -> Self {
        Self {
            store,
            catalog,
            sessions,
        }
    }
}
