//! Route definitions for the `/carros` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::carro;
use crate::state::AppState;

/// Collection and item routes, trailing slash included.
///
/// ```text
/// GET    /carros/          -> list
/// POST   /carros/          -> create
/// GET    /carros/{id}/     -> get_by_id
/// PUT    /carros/{id}/     -> update
/// PATCH  /carros/{id}/     -> partial_update
/// DELETE /carros/{id}/     -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/carros/", get(carro::list).post(carro::create))
        .route(
            "/carros/{id}/",
            get(carro::get_by_id)
                .put(carro::update)
                .patch(carro::partial_update)
                .delete(carro::delete),
        )
}
