use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use super::{ValidatedJson, ValidatedQuery};
use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{CreateTeamRequest, FeaturedParams, TeamWithMembers, UpdateTeamRequest},
    repository::Repository,
    slug::slugify,
};

/// team_slug
///
/// Derives the slug for `name` and refuses it when another team (anything but
/// `owner`) already holds the name or the slug. Teams never get a suffix.
async fn team_slug(repo: &dyn Repository, name: &str, owner: Option<i64>) -> AppResult<String> {
    let name = name.trim();
    if let Some(existing) = repo.get_team_by_name(name).await? {
        if Some(existing.id) != owner {
            return Err(AppError::BadRequest(format!("A team named '{name}' already exists")));
        }
    }

    let slug = slugify(name);
    if slug.is_empty() {
        return Err(AppError::BadRequest(
            "Team name must contain letters or digits".to_string(),
        ));
    }
    if let Some(existing) = repo.get_team_by_slug(&slug).await? {
        if Some(existing.team.id) != owner {
            return Err(AppError::BadRequest(format!("Slug '{slug}' is already in use")));
        }
    }
    Ok(slug)
}

#[utoipa::path(
    get,
    path = "/teams",
    tag = "teams",
    responses((status = 200, description = "All teams with members", body = [TeamWithMembers]))
)]
pub async fn list_teams(State(state): State<AppState>) -> AppResult<Json<Vec<TeamWithMembers>>> {
    Ok(Json(state.repo.list_teams().await?))
}

#[utoipa::path(
    get,
    path = "/teams/featured",
    tag = "teams",
    params(FeaturedParams),
    responses((status = 200, description = "Featured teams", body = [TeamWithMembers]))
)]
pub async fn featured_teams(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<FeaturedParams>,
) -> AppResult<Json<Vec<TeamWithMembers>>> {
    Ok(Json(state.repo.featured_teams(params.limit).await?))
}

#[utoipa::path(
    get,
    path = "/teams/{id}",
    tag = "teams",
    params(("id" = i64, Path, description = "Team ID")),
    responses((status = 200, description = "Found", body = TeamWithMembers), (status = 404, description = "Not Found"))
)]
pub async fn get_team(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<TeamWithMembers>> {
    state
        .repo
        .get_team(id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Team"))
}

#[utoipa::path(
    get,
    path = "/teams/slug/{slug}",
    tag = "teams",
    params(("slug" = String, Path, description = "Team slug")),
    responses((status = 200, description = "Found", body = TeamWithMembers), (status = 404, description = "Not Found"))
)]
pub async fn get_team_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<TeamWithMembers>> {
    state
        .repo
        .get_team_by_slug(&slug)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Team"))
}

/// create_team
///
/// [Admin Route] Creates the team and its roster in one transaction. A taken
/// name or slug is a 400.
#[utoipa::path(
    post,
    path = "/teams",
    tag = "teams",
    request_body = CreateTeamRequest,
    responses(
        (status = 201, description = "Created", body = TeamWithMembers),
        (status = 400, description = "Duplicate name or slug")
    )
)]
pub async fn create_team(
    State(state): State<AppState>,
    ValidatedJson(mut req): ValidatedJson<CreateTeamRequest>,
) -> AppResult<(StatusCode, Json<TeamWithMembers>)> {
    req.name = req.name.trim().to_string();
    let slug = team_slug(state.repo.as_ref(), &req.name, None).await?;

    let team = state.repo.create_team(req, slug).await?;
    tracing::info!(team_id = team.team.id, slug = %team.team.slug, "Team created");
    Ok((StatusCode::CREATED, Json(team)))
}

/// update_team
///
/// [Admin Route] Partial update. A rename re-derives the slug; `members`,
/// when present, replaces the whole roster.
#[utoipa::path(
    put,
    path = "/teams/{id}",
    tag = "teams",
    request_body = UpdateTeamRequest,
    responses(
        (status = 200, description = "Updated", body = TeamWithMembers),
        (status = 400, description = "Duplicate name or slug"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_team(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(mut req): ValidatedJson<UpdateTeamRequest>,
) -> AppResult<Json<TeamWithMembers>> {
    if let Some(members) = &req.members {
        for member in members {
            member.validate()?;
        }
    }

    let current = state.repo.get_team(id).await?.ok_or(AppError::NotFound("Team"))?;

    req.name = req.name.map(|name| name.trim().to_string());
    let slug = match req.name.as_deref() {
        Some(name) if name != current.team.name => {
            Some(team_slug(state.repo.as_ref(), name, Some(id)).await?)
        }
        _ => None,
    };

    state
        .repo
        .update_team(id, req, slug)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Team"))
}

#[utoipa::path(
    delete,
    path = "/teams/{id}",
    tag = "teams",
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found"))
)]
pub async fn delete_team(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<StatusCode> {
    if state.repo.delete_team(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("Team"))
    }
}
