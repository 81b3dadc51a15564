use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use super::ValidatedJson;
use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{CreateGalleryEventRequest, GalleryEvent, UpdateGalleryEventRequest},
};

/// list_gallery_events
///
/// [Public Route] Every gallery entry, most recent `date` first.
#[utoipa::path(
    get,
    path = "/gallery-events",
    tag = "gallery",
    responses((status = 200, description = "Gallery", body = [GalleryEvent]))
)]
pub async fn list_gallery_events(State(state): State<AppState>) -> AppResult<Json<Vec<GalleryEvent>>> {
    Ok(Json(state.repo.list_gallery_events().await?))
}

#[utoipa::path(
    get,
    path = "/gallery-events/{id}",
    tag = "gallery",
    params(("id" = i64, Path, description = "Gallery event ID")),
    responses((status = 200, description = "Found", body = GalleryEvent), (status = 404, description = "Not Found"))
)]
pub async fn get_gallery_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<GalleryEvent>> {
    state
        .repo
        .get_gallery_event(id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Gallery event"))
}

#[utoipa::path(
    post,
    path = "/gallery-events",
    tag = "gallery",
    request_body = CreateGalleryEventRequest,
    responses((status = 201, description = "Created", body = GalleryEvent))
)]
pub async fn create_gallery_event(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateGalleryEventRequest>,
) -> AppResult<(StatusCode, Json<GalleryEvent>)> {
    let item = state.repo.create_gallery_event(req).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

#[utoipa::path(
    put,
    path = "/gallery-events/{id}",
    tag = "gallery",
    request_body = UpdateGalleryEventRequest,
    responses((status = 200, description = "Updated", body = GalleryEvent), (status = 404, description = "Not Found"))
)]
pub async fn update_gallery_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateGalleryEventRequest>,
) -> AppResult<Json<GalleryEvent>> {
    state
        .repo
        .update_gallery_event(id, req)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Gallery event"))
}

#[utoipa::path(
    delete,
    path = "/gallery-events/{id}",
    tag = "gallery",
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found"))
)]
pub async fn delete_gallery_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    if state.repo.delete_gallery_event(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("Gallery event"))
    }
}
