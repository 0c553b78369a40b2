//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Pagination parameters (`?limit=&offset=`).
///
/// When both are absent, list endpoints return a bare array. Values are
/// clamped via `concessionaria_core::pagination`.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// True when the client asked for a paginated envelope.
    pub fn is_requested(&self) -> bool {
        self.limit.is_some() || self.offset.is_some()
    }
}
