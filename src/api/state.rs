//! Application state for the Budget Engine API.

use std::sync::Arc;

use crate::config::Catalog;

/// Shared application state.
///
/// The catalog is loaded once at startup and shared read-only by every
/// request handler.
#[derive(Clone)]
pub struct AppState {
    catalog: Arc<Catalog>,
}

impl AppState {
    /// Creates a new application state around a loaded catalog.
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }

    /// Returns a reference to the catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}
