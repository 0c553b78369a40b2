use std::sync::Arc;

use crate::config::ServerConfig;
use crate::photos::PhotoStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool. The only shared mutable resource.
    pub pool: concessionaria_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Where uploaded photos are written and how they are addressed.
    pub photos: Arc<PhotoStore>,
}

impl AppState {
    pub fn new(pool: concessionaria_db::DbPool, config: ServerConfig) -> Self {
        let photos = PhotoStore::new(config.media_root.clone(), config.media_url.clone());
        Self {
            pool,
            config: Arc::new(config),
            photos: Arc::new(photos),
        }
    }
}
