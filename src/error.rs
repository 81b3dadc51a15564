use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use validator::ValidationErrors;

/// AppError
///
/// Every handler returns `Result<_, AppError>`. The response body is always
/// `{"detail": <message>, "code": <CODE>}` so the frontend can branch on `code`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// Missing, malformed or expired admin token.
    #[error("Not authenticated")]
    Unauthorized,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Two-factor code required")]
    TwoFactorRequired,

    #[error("Invalid two-factor code")]
    InvalidTwoFactorCode,

    /// A wrong code while confirming enrollment. Same code, but a 400: the
    /// session itself is fine.
    #[error("Invalid two-factor code")]
    TwoFactorSetupRejected,

    /// The token is valid but no admin matches its subject.
    #[error("Forbidden")]
    Forbidden,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Status, code and client-facing detail. Database errors are classified
    /// (and 500s logged) here, once per response.
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::NotFound(entity) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", format!("{entity} not found"))
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", errors.to_string())
            }
            AppError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "NOT_AUTHENTICATED", self.to_string())
            }
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS", self.to_string())
            }
            AppError::TwoFactorRequired => {
                (StatusCode::UNAUTHORIZED, "TWO_FACTOR_REQUIRED", self.to_string())
            }
            AppError::InvalidTwoFactorCode => {
                (StatusCode::UNAUTHORIZED, "INVALID_TWO_FACTOR_CODE", self.to_string())
            }
            AppError::TwoFactorSetupRejected => {
                (StatusCode::BAD_REQUEST, "INVALID_TWO_FACTOR_CODE", self.to_string())
            }
            AppError::Forbidden => {
                (StatusCode::FORBIDDEN, "FORBIDDEN", "Admin account not found".to_string())
            }
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, detail) = self.parts();

        let mut response = (status, Json(json!({ "detail": detail, "code": code }))).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

/// classify_sqlx_error
///
/// Unique violations (Postgres `23505`) are client errors: a duplicate slug
/// or name. Everything else is logged and hidden behind a generic 500.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
            let constraint = db_err.constraint().unwrap_or("unknown");
            (
                StatusCode::BAD_REQUEST,
                "DUPLICATE",
                format!("Duplicate value violates unique constraint: {constraint}"),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Internal server error".to_string(),
            )
        }
    }
}
