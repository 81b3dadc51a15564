use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use indexmap::IndexMap;

use super::ValidatedJson;
use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{CreateJourneyPersonRequest, JourneyPerson, UpdateJourneyPersonRequest},
};

/// People keyed by year, newest year first. The input must already be sorted
/// by `(year desc, created_at asc, id asc)`; each bucket keeps that order.
pub fn group_by_year(people: Vec<JourneyPerson>) -> IndexMap<i32, Vec<JourneyPerson>> {
    let mut grouped: IndexMap<i32, Vec<JourneyPerson>> = IndexMap::new();
    for person in people {
        grouped.entry(person.year).or_default().push(person);
    }
    grouped
}

/// list_journey
///
/// [Public Route] `{ "2024": [...], "2023": [...] }`. Within a year people
/// appear in the order they were added.
#[utoipa::path(
    get,
    path = "/journey",
    tag = "journey",
    responses((status = 200, description = "People grouped by year", body = std::collections::HashMap<String, Vec<JourneyPerson>>))
)]
pub async fn list_journey(
    State(state): State<AppState>,
) -> AppResult<Json<IndexMap<i32, Vec<JourneyPerson>>>> {
    let people = state.repo.list_journey_people().await?;
    Ok(Json(group_by_year(people)))
}

#[utoipa::path(
    post,
    path = "/journey",
    tag = "journey",
    request_body = CreateJourneyPersonRequest,
    responses((status = 201, description = "Created", body = JourneyPerson))
)]
pub async fn create_journey_person(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateJourneyPersonRequest>,
) -> AppResult<(StatusCode, Json<JourneyPerson>)> {
    let person = state.repo.create_journey_person(req).await?;
    Ok((StatusCode::CREATED, Json(person)))
}

#[utoipa::path(
    put,
    path = "/journey/{id}",
    tag = "journey",
    request_body = UpdateJourneyPersonRequest,
    responses((status = 200, description = "Updated", body = JourneyPerson), (status = 404, description = "Not Found"))
)]
pub async fn update_journey_person(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateJourneyPersonRequest>,
) -> AppResult<Json<JourneyPerson>> {
    state
        .repo
        .update_journey_person(id, req)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Journey person"))
}

#[utoipa::path(
    delete,
    path = "/journey/{id}",
    tag = "journey",
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found"))
)]
pub async fn delete_journey_person(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    if state.repo.delete_journey_person(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("Journey person"))
    }
}
