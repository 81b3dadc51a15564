use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;

use super::{ValidatedJson, ValidatedQuery};
use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{CreateEventRequest, Event, Pagination, UpcomingParams, UpdateEventRequest},
    repository::Repository,
    slug::{slugify, with_timestamp_suffix},
};

/// unique_event_slug
///
/// Keeps `candidate` when it is free (or already belongs to `owner`), else
/// appends the current unix timestamp. Existing events are never touched.
async fn unique_event_slug(
    repo: &dyn Repository,
    candidate: String,
    owner: Option<i64>,
) -> AppResult<String> {
    if candidate.is_empty() {
        return Err(AppError::BadRequest(
            "Could not derive a slug; provide a title with letters or digits".to_string(),
        ));
    }
    match repo.get_event_by_slug(&candidate).await? {
        Some(existing) if Some(existing.id) != owner => {
            Ok(with_timestamp_suffix(&candidate, Utc::now()))
        }
        _ => Ok(candidate),
    }
}

fn requested_slug(slug: Option<&str>) -> Option<String> {
    slug.map(str::trim).filter(|s| !s.is_empty()).map(String::from)
}

#[utoipa::path(
    get,
    path = "/events",
    tag = "events",
    params(Pagination),
    responses((status = 200, description = "Events, latest start first", body = [Event]))
)]
pub async fn list_events(
    State(state): State<AppState>,
    ValidatedQuery(page): ValidatedQuery<Pagination>,
) -> AppResult<Json<Vec<Event>>> {
    Ok(Json(state.repo.list_events(page.skip, page.limit).await?))
}

/// upcoming_events
///
/// [Public Route] Events that have not started yet, soonest first.
#[utoipa::path(
    get,
    path = "/events/upcoming",
    tag = "events",
    params(UpcomingParams),
    responses((status = 200, description = "Upcoming events", body = [Event]))
)]
pub async fn upcoming_events(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<UpcomingParams>,
) -> AppResult<Json<Vec<Event>>> {
    Ok(Json(state.repo.upcoming_events(Utc::now(), params.limit).await?))
}

#[utoipa::path(
    get,
    path = "/events/slug/{slug}",
    tag = "events",
    params(("slug" = String, Path, description = "Event slug")),
    responses((status = 200, description = "Found", body = Event), (status = 404, description = "Not Found"))
)]
pub async fn get_event_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Event>> {
    state
        .repo
        .get_event_by_slug(&slug)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Event"))
}

#[utoipa::path(
    get,
    path = "/events/{id}",
    tag = "events",
    params(("id" = i64, Path, description = "Event ID")),
    responses((status = 200, description = "Found", body = Event), (status = 404, description = "Not Found"))
)]
pub async fn get_event(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<Event>> {
    state
        .repo
        .get_event(id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Event"))
}

/// create_event
///
/// [Admin Route] The slug comes from the request or, failing that, from the
/// title. A taken slug gets a `-<unix seconds>` suffix.
#[utoipa::path(
    post,
    path = "/events",
    tag = "events",
    request_body = CreateEventRequest,
    responses((status = 201, description = "Created", body = Event))
)]
pub async fn create_event(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateEventRequest>,
) -> AppResult<(StatusCode, Json<Event>)> {
    let candidate = requested_slug(req.slug.as_deref()).unwrap_or_else(|| slugify(&req.title));
    let slug = unique_event_slug(state.repo.as_ref(), candidate, None).await?;

    let event = state.repo.create_event(req, slug).await?;
    tracing::info!(event_id = event.id, slug = %event.slug, "Event created");
    Ok((StatusCode::CREATED, Json(event)))
}

/// update_event
///
/// [Admin Route] Partial update. A new `slug` goes through the same
/// collision rule as on create; the title never rewrites the slug.
#[utoipa::path(
    put,
    path = "/events/{id}",
    tag = "events",
    request_body = UpdateEventRequest,
    responses((status = 200, description = "Updated", body = Event), (status = 404, description = "Not Found"))
)]
pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateEventRequest>,
) -> AppResult<Json<Event>> {
    let slug = match requested_slug(req.slug.as_deref()) {
        Some(candidate) => Some(unique_event_slug(state.repo.as_ref(), candidate, Some(id)).await?),
        None => None,
    };

    state
        .repo
        .update_event(id, req, slug)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Event"))
}

#[utoipa::path(
    delete,
    path = "/events/{id}",
    tag = "events",
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found"))
)]
pub async fn delete_event(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<StatusCode> {
    if state.repo.delete_event(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("Event"))
    }
}
