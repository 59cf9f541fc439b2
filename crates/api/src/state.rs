use std::sync::Arc;

use huecos_db::Store;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Storage backend chosen at startup (Postgres or in-memory).
    pub store: Arc<dyn Store>,
    /// Server configuration (JWT settings, offline admin, timeouts).
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: ServerConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    /// The store as a trait object reference, for repository calls.
    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }
}
