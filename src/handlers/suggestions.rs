use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use super::{ValidatedJson, ValidatedQuery};
use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{CreateSuggestionRequest, EventSuggestion, StatusUpdateRequest, SuggestionParams},
};

/// create_suggestion
///
/// [Public Route] Anyone can propose an event; it starts as `pending`.
#[utoipa::path(
    post,
    path = "/event-suggestions",
    tag = "event-suggestions",
    request_body = CreateSuggestionRequest,
    responses((status = 201, description = "Created", body = EventSuggestion))
)]
pub async fn create_suggestion(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateSuggestionRequest>,
) -> AppResult<(StatusCode, Json<EventSuggestion>)> {
    let suggestion = state.repo.create_suggestion(req).await?;
    Ok((StatusCode::CREATED, Json(suggestion)))
}

#[utoipa::path(
    get,
    path = "/event-suggestions",
    tag = "event-suggestions",
    params(SuggestionParams),
    responses((status = 200, description = "Suggestions, newest first", body = [EventSuggestion]))
)]
pub async fn list_suggestions(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<SuggestionParams>,
) -> AppResult<Json<Vec<EventSuggestion>>> {
    Ok(Json(state.repo.list_suggestions(params.skip, params.limit).await?))
}

#[utoipa::path(
    get,
    path = "/event-suggestions/{id}",
    tag = "event-suggestions",
    params(("id" = i64, Path, description = "Suggestion ID")),
    responses((status = 200, description = "Found", body = EventSuggestion), (status = 404, description = "Not Found"))
)]
pub async fn get_suggestion(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<EventSuggestion>> {
    state
        .repo
        .get_suggestion(id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Suggestion"))
}

#[utoipa::path(
    patch,
    path = "/event-suggestions/{id}/status",
    tag = "event-suggestions",
    request_body = StatusUpdateRequest,
    responses((status = 200, description = "Updated", body = EventSuggestion), (status = 404, description = "Not Found"))
)]
pub async fn update_suggestion_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<StatusUpdateRequest>,
) -> AppResult<Json<EventSuggestion>> {
    state
        .repo
        .set_suggestion_status(id, req.status)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Suggestion"))
}

#[utoipa::path(
    delete,
    path = "/event-suggestions/{id}",
    tag = "event-suggestions",
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found"))
)]
pub async fn delete_suggestion(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    if state.repo.delete_suggestion(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("Suggestion"))
    }
}
