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
    models::{CreateCrewMemberRequest, CrewMember, UpdateCrewMemberRequest},
};

/// Members keyed by category, in the order the repository returned them.
pub fn group_by_category(members: Vec<CrewMember>) -> IndexMap<String, Vec<CrewMember>> {
    let mut grouped: IndexMap<String, Vec<CrewMember>> = IndexMap::new();
    for member in members {
        grouped.entry(member.category.clone()).or_default().push(member);
    }
    grouped
}

/// list_crew
///
/// [Public Route] `{ "<category>": [...] }`, each list sorted by
/// `(order_index, created_at, id)`.
#[utoipa::path(
    get,
    path = "/crew",
    tag = "crew",
    responses((status = 200, description = "Crew grouped by category", body = std::collections::HashMap<String, Vec<CrewMember>>))
)]
pub async fn list_crew(
    State(state): State<AppState>,
) -> AppResult<Json<IndexMap<String, Vec<CrewMember>>>> {
    let members = state.repo.list_crew_members().await?;
    Ok(Json(group_by_category(members)))
}

/// create_crew_member
///
/// [Admin Route] Without `order_index` the member goes to the end of its
/// category.
#[utoipa::path(
    post,
    path = "/crew",
    tag = "crew",
    request_body = CreateCrewMemberRequest,
    responses((status = 201, description = "Created", body = CrewMember))
)]
pub async fn create_crew_member(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateCrewMemberRequest>,
) -> AppResult<(StatusCode, Json<CrewMember>)> {
    let member = state.repo.create_crew_member(req).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

/// update_crew_member
///
/// [Admin Route] Moving a member to another category without an explicit
/// `order_index` appends it to the end of the new category.
#[utoipa::path(
    put,
    path = "/crew/{id}",
    tag = "crew",
    request_body = UpdateCrewMemberRequest,
    responses((status = 200, description = "Updated", body = CrewMember), (status = 404, description = "Not Found"))
)]
pub async fn update_crew_member(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateCrewMemberRequest>,
) -> AppResult<Json<CrewMember>> {
    state
        .repo
        .update_crew_member(id, req)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Crew member"))
}

#[utoipa::path(
    delete,
    path = "/crew/{id}",
    tag = "crew",
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found"))
)]
pub async fn delete_crew_member(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    if state.repo.delete_crew_member(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("Crew member"))
    }
}
