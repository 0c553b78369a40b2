pub mod carro;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the resource route tree.
///
/// ```text
/// /carros/                    list, create
/// /carros/{id}/               retrieve, update, partial update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(carro::router())
}
