use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use super::{ValidatedJson, ValidatedQuery};
use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{
        ApplicationFilter, CommunityApplication, CreateApplicationRequest, StatusUpdateRequest,
    },
};

/// apply
///
/// [Public Route] Submits a join request. Text fields are trimmed and blank
/// interests dropped before storage; at least one interest must remain.
#[utoipa::path(
    post,
    path = "/community/apply",
    tag = "community",
    request_body = CreateApplicationRequest,
    responses(
        (status = 201, description = "Application received", body = CommunityApplication),
        (status = 400, description = "Invalid application")
    )
)]
pub async fn apply(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateApplicationRequest>,
) -> AppResult<(StatusCode, Json<CommunityApplication>)> {
    let req = req.normalized();
    if req.interests.is_empty() {
        return Err(AppError::BadRequest("Select at least one interest".to_string()));
    }

    let application = state.repo.create_application(req).await?;
    tracing::info!(application_id = application.id, "Community application received");
    Ok((StatusCode::CREATED, Json(application)))
}

#[utoipa::path(
    get,
    path = "/community/applications",
    tag = "community",
    params(ApplicationFilter),
    responses((status = 200, description = "Applications, newest first", body = [CommunityApplication]))
)]
pub async fn list_applications(
    State(state): State<AppState>,
    ValidatedQuery(filter): ValidatedQuery<ApplicationFilter>,
) -> AppResult<Json<Vec<CommunityApplication>>> {
    Ok(Json(state.repo.list_applications(&filter).await?))
}

#[utoipa::path(
    get,
    path = "/community/applications/{id}",
    tag = "community",
    params(("id" = i64, Path, description = "Application ID")),
    responses((status = 200, description = "Found", body = CommunityApplication), (status = 404, description = "Not Found"))
)]
pub async fn get_application(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<CommunityApplication>> {
    state
        .repo
        .get_application(id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Application"))
}

#[utoipa::path(
    patch,
    path = "/community/applications/{id}/status",
    tag = "community",
    request_body = StatusUpdateRequest,
    responses((status = 200, description = "Updated", body = CommunityApplication), (status = 404, description = "Not Found"))
)]
pub async fn update_application_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<StatusUpdateRequest>,
) -> AppResult<Json<CommunityApplication>> {
    state
        .repo
        .set_application_status(id, req.status)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Application"))
}

#[utoipa::path(
    delete,
    path = "/community/applications/{id}",
    tag = "community",
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found"))
)]
pub async fn delete_application(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    if state.repo.delete_application(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("Application"))
    }
}
