//! HTTP handlers, one module per resource.
//!
//! Handlers validate their input before touching the repository, map
//! absence to 404 and shape the response. Admin-only handlers are guarded at
//! the router level; the ones that need the admin's identity also take an
//! [`AdminSession`](crate::auth::AdminSession) argument, which picks up the
//! admin the guard already resolved.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Query, Request, multipart::MultipartError},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

pub mod admin;
pub mod blog;
pub mod community;
pub mod crew;
pub mod events;
pub mod gallery;
pub mod journey;
pub mod posters;
pub mod suggestions;
pub mod teams;
pub mod timeline;
pub mod uploads;

/// ValidatedJson
///
/// `Json<T>` followed by `T::validate()`. Malformed bodies (unknown enum
/// values, bad dates, wrong types) and failed validation both become 400
/// with the usual error body.
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// Query-string counterpart of [`ValidatedJson`].
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        value.validate()?;
        Ok(Self(value))
    }
}

pub(crate) fn multipart_error(err: MultipartError) -> AppError {
    AppError::BadRequest(format!("Invalid multipart body: {}", err.body_text()))
}
