use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use super::{ValidatedJson, ValidatedQuery};
use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{Blog, BlogFilter, BlogPage, CreateBlogRequest, UpdateBlogRequest},
};

/// list_blogs
///
/// [Public Route] One page of blog posts, newest first. `q` searches title,
/// preview and content; `category` is an exact match.
#[utoipa::path(
    get,
    path = "/blogs",
    tag = "blogs",
    params(BlogFilter),
    responses((status = 200, description = "Page of posts", body = BlogPage))
)]
pub async fn list_blogs(
    State(state): State<AppState>,
    ValidatedQuery(filter): ValidatedQuery<BlogFilter>,
) -> AppResult<Json<BlogPage>> {
    let (items, total) = state.repo.list_blogs(&filter).await?;
    Ok(Json(BlogPage {
        items,
        total,
        page: filter.page,
        page_size: filter.page_size,
    }))
}

#[utoipa::path(
    get,
    path = "/blogs/{id}",
    tag = "blogs",
    params(("id" = i64, Path, description = "Blog ID")),
    responses(
        (status = 200, description = "Found", body = Blog),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_blog(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<Blog>> {
    state
        .repo
        .get_blog(id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Blog"))
}

/// create_blog
///
/// [Admin Route] `date` accepts `YYYY-MM-DD` or `DD.MM.YYYY`.
#[utoipa::path(
    post,
    path = "/blogs",
    tag = "blogs",
    request_body = CreateBlogRequest,
    responses((status = 201, description = "Created", body = Blog))
)]
pub async fn create_blog(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateBlogRequest>,
) -> AppResult<(StatusCode, Json<Blog>)> {
    let blog = state.repo.create_blog(req).await?;
    Ok((StatusCode::CREATED, Json(blog)))
}

#[utoipa::path(
    put,
    path = "/blogs/{id}",
    tag = "blogs",
    request_body = UpdateBlogRequest,
    responses((status = 200, description = "Updated", body = Blog))
)]
pub async fn update_blog(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateBlogRequest>,
) -> AppResult<Json<Blog>> {
    state
        .repo
        .update_blog(id, req)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Blog"))
}

#[utoipa::path(
    delete,
    path = "/blogs/{id}",
    tag = "blogs",
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found"))
)]
pub async fn delete_blog(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<StatusCode> {
    if state.repo.delete_blog(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("Blog"))
    }
}
