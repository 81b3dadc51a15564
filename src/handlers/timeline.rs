use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use super::ValidatedJson;
use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{CreateTimelineEventRequest, TimelineEvent, UpdateTimelineEventRequest},
};

#[utoipa::path(
    get,
    path = "/timeline",
    tag = "timeline",
    responses((status = 200, description = "Milestones, newest first", body = [TimelineEvent]))
)]
pub async fn list_timeline_events(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<TimelineEvent>>> {
    Ok(Json(state.repo.list_timeline_events().await?))
}

#[utoipa::path(
    get,
    path = "/timeline/{id}",
    tag = "timeline",
    params(("id" = i64, Path, description = "Timeline event ID")),
    responses((status = 200, description = "Found", body = TimelineEvent), (status = 404, description = "Not Found"))
)]
pub async fn get_timeline_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<TimelineEvent>> {
    state
        .repo
        .get_timeline_event(id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Timeline event"))
}

/// create_timeline_event
///
/// [Admin Route] A missing `image_url` is stored as an empty string.
#[utoipa::path(
    post,
    path = "/timeline",
    tag = "timeline",
    request_body = CreateTimelineEventRequest,
    responses((status = 201, description = "Created", body = TimelineEvent))
)]
pub async fn create_timeline_event(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateTimelineEventRequest>,
) -> AppResult<(StatusCode, Json<TimelineEvent>)> {
    let item = state.repo.create_timeline_event(req).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

#[utoipa::path(
    put,
    path = "/timeline/{id}",
    tag = "timeline",
    request_body = UpdateTimelineEventRequest,
    responses((status = 200, description = "Updated", body = TimelineEvent), (status = 404, description = "Not Found"))
)]
pub async fn update_timeline_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateTimelineEventRequest>,
) -> AppResult<Json<TimelineEvent>> {
    state
        .repo
        .update_timeline_event(id, req)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Timeline event"))
}

#[utoipa::path(
    delete,
    path = "/timeline/{id}",
    tag = "timeline",
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found"))
)]
pub async fn delete_timeline_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    if state.repo.delete_timeline_event(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("Timeline event"))
    }
}
