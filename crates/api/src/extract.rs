//! Path and query extractors that reject with [`AppError`] JSON bodies.

use axum::extract::{FromRequestParts, Path, Query};
use axum::http::request::Parts;
use concessionaria_core::types::DbId;

use crate::error::AppError;
use crate::query::PaginationParams;

/// The `{id}` segment of `/carros/{id}/`.
///
/// An id that is not an integer cannot match any row, so it is reported as
/// 404 rather than a malformed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarroId(pub DbId);

impl<S> FromRequestParts<S> for CarroId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        raw.parse::<DbId>()
            .map(CarroId)
            .map_err(|_| AppError::NotFound(format!("Carro with id {raw} not found")))
    }
}

/// `?limit=&offset=` for list endpoints.
#[derive(Debug, Default)]
pub struct Pagination(pub PaginationParams);

impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<PaginationParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        Ok(Pagination(params))
    }
}
