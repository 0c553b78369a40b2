//! Handlers for the `/carros` resource.
//!
//! Each handler is a straight pipe: validate the body, touch the store, render
//! the row. Photos are written before the row and removed again if the
//! database write fails, so an orphaned file is the worst case on error.

use axum::extract::{OriginalUri, State};
use axum::http::StatusCode;
use axum::Json;
use concessionaria_core::carro::{self, CarroRepresentation};
use concessionaria_core::error::CoreError;
use concessionaria_core::pagination::{
    clamp_limit, clamp_offset, page_links, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT,
};
use concessionaria_core::types::DbId;
use concessionaria_db::models::carro::{Carro, CreateCarro, UpdateCarro};
use concessionaria_db::repositories::CarroRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{CarroId, Pagination};
use crate::payload::CarroPayload;
use crate::photos::PhotoStore;
use crate::response::{Listing, Page};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Carro", id })
}

fn render(carro: &Carro, photos: &PhotoStore) -> CarroRepresentation {
    carro.to_representation(photos.media_url())
}

/// GET /carros/
///
/// Returns every carro as a bare array, or a page envelope when `limit` or
/// `offset` is given.
pub async fn list(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Pagination(params): Pagination,
) -> AppResult<Json<Listing<CarroRepresentation>>> {
    if !params.is_requested() {
        let carros = CarroRepo::list(&state.pool).await?;
        let results = carros.iter().map(|c| render(c, &state.photos)).collect();
        return Ok(Json(Listing::All(results)));
    }

    let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
    let offset = clamp_offset(params.offset);
    let count = CarroRepo::count(&state.pool).await?;
    let carros = CarroRepo::list_page(&state.pool, limit, offset).await?;
    let (next, previous) = page_links(uri.path(), limit, offset, count);

    Ok(Json(Listing::Paged(Page {
        count,
        next,
        previous,
        results: carros.iter().map(|c| render(c, &state.photos)).collect(),
    })))
}

/// POST /carros/
pub async fn create(
    State(state): State<AppState>,
    payload: CarroPayload,
) -> AppResult<(StatusCode, Json<CarroRepresentation>)> {
    let fields = carro::deserialize_create(&payload.fields)?;

    let foto = match &payload.foto {
        Some(upload) => Some(state.photos.save(upload).await?),
        None => None,
    };

    let input = CreateCarro::new(fields, foto);
    let created = match CarroRepo::create(&state.pool, &input).await {
        Ok(created) => created,
        Err(e) => {
            if let Some(path) = &input.foto {
                state.photos.remove(path).await;
            }
            return Err(e.into());
        }
    };

    tracing::info!(carro_id = created.id, carro = %created, "Carro created");
    Ok((StatusCode::CREATED, Json(render(&created, &state.photos))))
}

/// GET /carros/{id}/
pub async fn get_by_id(
    State(state): State<AppState>,
    CarroId(id): CarroId,
) -> AppResult<Json<CarroRepresentation>> {
    let carro = CarroRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(render(&carro, &state.photos)))
}

/// PUT /carros/{id}/
///
/// Full update: every writable field must be present. `foto` is optional and
/// left alone when omitted.
pub async fn update(
    State(state): State<AppState>,
    CarroId(id): CarroId,
    payload: CarroPayload,
) -> AppResult<Json<CarroRepresentation>> {
    apply_update(&state, id, payload, false).await.map(Json)
}

/// PATCH /carros/{id}/
///
/// Partial update: only fields present in the body are changed.
pub async fn partial_update(
    State(state): State<AppState>,
    CarroId(id): CarroId,
    payload: CarroPayload,
) -> AppResult<Json<CarroRepresentation>> {
    apply_update(&state, id, payload, true).await.map(Json)
}

async fn apply_update(
    state: &AppState,
    id: DbId,
    payload: CarroPayload,
    partial: bool,
) -> AppResult<CarroRepresentation> {
    let existing = CarroRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let changes = carro::deserialize_update(&payload.fields, partial)?;

    let uploaded = match &payload.foto {
        Some(upload) => Some(state.photos.save(upload).await?),
        None => None,
    };

    let input = UpdateCarro::new(changes, uploaded);
    let updated = match CarroRepo::update(&state.pool, id, &input).await {
        Ok(Some(updated)) => updated,
        Ok(None) => {
            discard_new_photo(state, &input).await;
            return Err(not_found(id));
        }
        Err(e) => {
            discard_new_photo(state, &input).await;
            return Err(e.into());
        }
    };

    if input.touches_foto() && existing.foto != updated.foto {
        if let Some(old) = &existing.foto {
            state.photos.remove(old).await;
        }
    }

    tracing::info!(carro_id = id, partial, "Carro updated");
    Ok(render(&updated, &state.photos))
}

async fn discard_new_photo(state: &AppState, input: &UpdateCarro) {
    if let Some(Some(path)) = &input.foto {
        state.photos.remove(path).await;
    }
}

/// DELETE /carros/{id}/
pub async fn delete(
    State(state): State<AppState>,
    CarroId(id): CarroId,
) -> AppResult<StatusCode> {
    let deleted = CarroRepo::delete(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    if let Some(path) = &deleted.foto {
        state.photos.remove(path).await;
    }

    tracing::info!(carro_id = id, "Carro deleted");
    Ok(StatusCode::NO_CONTENT)
}
