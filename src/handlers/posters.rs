use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use validator::Validate;

use super::{ValidatedJson, ValidatedQuery, multipart_error};
use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{CreatePosterRequest, Poster, PosterFilter, ReorderRequest, UpdatePosterRequest},
    ordering::reorder_positions,
};

/// Multipart form of `POST /posters`. Documentation only; the handler reads
/// the parts by hand.
#[allow(dead_code)]
#[derive(utoipa::ToSchema)]
pub struct PosterForm {
    title: String,
    subtitle: Option<String>,
    content: Option<String>,
    image_url: Option<String>,
    is_active: Option<bool>,
    order_index: Option<i32>,
    #[schema(content_media_type = "application/octet-stream")]
    file: Option<String>,
}

struct UploadedFile {
    name: Option<String>,
    bytes: Vec<u8>,
}

fn parse_bool(field: &str, raw: &str) -> AppResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Ok(true),
        "false" | "0" | "off" | "no" => Ok(false),
        other => Err(AppError::BadRequest(format!("{field}: '{other}' is not a boolean"))),
    }
}

fn non_empty(raw: String) -> Option<String> {
    if raw.trim().is_empty() { None } else { Some(raw) }
}

/// read_poster_form
///
/// Collects the text parts into a [`CreatePosterRequest`] and keeps the file
/// part aside. Unknown parts are ignored; an empty file part counts as no file.
async fn read_poster_form(
    mut multipart: Multipart,
) -> AppResult<(CreatePosterRequest, Option<UploadedFile>)> {
    let mut req = CreatePosterRequest::default();
    let mut title = None;
    let mut file = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == "file" {
            let file_name = field.file_name().map(str::to_string);
            let bytes = field.bytes().await.map_err(multipart_error)?;
            if !bytes.is_empty() {
                file = Some(UploadedFile { name: file_name, bytes: bytes.to_vec() });
            }
            continue;
        }

        let value = field.text().await.map_err(multipart_error)?;
        match name.as_str() {
            "title" => title = Some(value),
            "subtitle" => req.subtitle = non_empty(value),
            "content" => req.content = non_empty(value),
            "image_url" => req.image_url = non_empty(value),
            "is_active" => req.is_active = Some(parse_bool("is_active", &value)?),
            "order_index" => {
                req.order_index = match non_empty(value) {
                    Some(raw) => Some(raw.trim().parse().map_err(|_| {
                        AppError::BadRequest(format!("order_index: '{raw}' is not an integer"))
                    })?),
                    None => None,
                }
            }
            _ => {}
        }
    }

    req.title = title.ok_or_else(|| AppError::BadRequest("title is required".to_string()))?;
    Ok((req, file))
}

/// list_posters
///
/// [Public Route] Posters in display order `(order_index, id)`. `active`
/// filters on `is_active` when given.
#[utoipa::path(
    get,
    path = "/posters",
    tag = "posters",
    params(PosterFilter),
    responses((status = 200, description = "Posters in display order", body = [Poster]))
)]
pub async fn list_posters(
    State(state): State<AppState>,
    ValidatedQuery(filter): ValidatedQuery<PosterFilter>,
) -> AppResult<Json<Vec<Poster>>> {
    Ok(Json(state.repo.list_posters(&filter).await?))
}

#[utoipa::path(
    get,
    path = "/posters/{id}",
    tag = "posters",
    params(("id" = i64, Path, description = "Poster ID")),
    responses((status = 200, description = "Found", body = Poster), (status = 404, description = "Not Found"))
)]
pub async fn get_poster(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<Poster>> {
    state
        .repo
        .get_poster(id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Poster"))
}

/// create_poster
///
/// [Admin Route] Multipart form. An attached `file` is stored first and its
/// URL replaces any `image_url` text part; the file is removed again if the
/// insert fails. Without `order_index` the poster
/// goes after the current last one.
#[utoipa::path(
    post,
    path = "/posters",
    tag = "posters",
    request_body(content = PosterForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Created", body = Poster),
        (status = 400, description = "Invalid form or file type")
    )
)]
pub async fn create_poster(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<Poster>)> {
    let (mut req, file) = read_poster_form(multipart).await?;
    req.validate()?;

    let mut stored = None;
    if let Some(file) = file {
        let url = state.storage.save(file.name.as_deref(), &file.bytes).await?;
        req.image_url = Some(url.clone());
        stored = Some(url);
    }

    let poster = match state.repo.create_poster(req).await {
        Ok(poster) => poster,
        Err(err) => {
            if let Some(url) = stored {
                if let Err(e) = state.storage.remove(&url).await {
                    tracing::warn!(error = %e, url = %url, "Could not remove orphaned upload");
                }
            }
            return Err(err.into());
        }
    };
    tracing::info!(poster_id = poster.id, order_index = poster.order_index, "Poster created");
    Ok((StatusCode::CREATED, Json(poster)))
}

#[utoipa::path(
    put,
    path = "/posters/{id}",
    tag = "posters",
    request_body = UpdatePosterRequest,
    responses((status = 200, description = "Updated", body = Poster), (status = 404, description = "Not Found"))
)]
pub async fn update_poster(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdatePosterRequest>,
) -> AppResult<Json<Poster>> {
    state
        .repo
        .update_poster(id, req)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Poster"))
}

#[utoipa::path(
    delete,
    path = "/posters/{id}",
    tag = "posters",
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found"))
)]
pub async fn delete_poster(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<StatusCode> {
    if state.repo.delete_poster(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("Poster"))
    }
}

/// reorder_posters
///
/// [Admin Route] Body is the list of poster ids in the desired order; each
/// listed poster gets its position (from 0) as `order_index`. Unknown ids are
/// skipped. Returns every poster in the new display order.
#[utoipa::path(
    post,
    path = "/posters/reorder",
    tag = "posters",
    request_body = ReorderRequest,
    responses(
        (status = 200, description = "All posters after reordering", body = [Poster]),
        (status = 400, description = "Body is not a list of ids")
    )
)]
pub async fn reorder_posters(
    State(state): State<AppState>,
    ValidatedJson(ReorderRequest(ids)): ValidatedJson<ReorderRequest>,
) -> AppResult<Json<Vec<Poster>>> {
    let positions = reorder_positions(&ids);
    Ok(Json(state.repo.reorder_posters(&positions).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_booleans() {
        assert!(parse_bool("is_active", "True").unwrap());
        assert!(!parse_bool("is_active", "0").unwrap());
        assert!(parse_bool("is_active", "maybe").is_err());
    }
}
