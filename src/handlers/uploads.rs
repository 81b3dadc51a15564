use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
};

use super::multipart_error;
use crate::{
    AppState,
    error::{AppError, AppResult},
    models::UploadResponse,
};

/// Multipart form of `POST /uploads`. Documentation only.
#[allow(dead_code)]
#[derive(utoipa::ToSchema)]
pub struct UploadForm {
    #[schema(content_media_type = "application/octet-stream")]
    file: String,
}

/// upload_image
///
/// [Admin Route] Stores the `file` part under a random name and returns its
/// public URL. Other parts are ignored.
#[utoipa::path(
    post,
    path = "/uploads",
    tag = "uploads",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Stored", body = UploadResponse),
        (status = 400, description = "Missing file or disallowed extension")
    )
)]
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<UploadResponse>)> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await.map_err(multipart_error)?;
        let url = state.storage.save(file_name.as_deref(), &bytes).await?;
        return Ok((StatusCode::CREATED, Json(UploadResponse { url })));
    }

    Err(AppError::BadRequest("Multipart field 'file' is required".to_string()))
}
