use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderValue, header},
};
use chrono::Utc;

use super::ValidatedJson;
use crate::{
    AppState,
    auth::{self, AdminSession},
    error::{AppError, AppResult},
    models::{
        Admin, AdminProfile, DashboardStats, DisableTwoFactorRequest, EnableTwoFactorRequest,
        LoginRequest, LoginResponse, MessageResponse, TwoFactorSetupResponse,
    },
    totp,
};

fn set_cookie(value: &str) -> AppResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    let value = HeaderValue::from_str(value)
        .map_err(|e| AppError::Internal(format!("invalid Set-Cookie value: {e}")))?;
    headers.insert(header::SET_COOKIE, value);
    Ok(headers)
}

/// login
///
/// [Public Route] Password first, then the TOTP code when the admin has 2FA
/// enabled. On success the token is returned in the body and also set as the
/// `admin_token` cookie.
///
/// Emails are matched lowercased. Unknown email and wrong password are
/// indistinguishable to the caller.
#[utoipa::path(
    post,
    path = "/admin/login",
    tag = "admin",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 401, description = "INVALID_CREDENTIALS, TWO_FACTOR_REQUIRED or INVALID_TWO_FACTOR_CODE")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> AppResult<(HeaderMap, Json<LoginResponse>)> {
    let email = req.email.trim().to_lowercase();
    let admin = state
        .repo
        .get_admin_by_email(&email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let password_ok = auth::verify_password(&req.password, &admin.password_hash).map_err(|e| {
        tracing::error!(admin_id = admin.id, error = %e, "Stored password hash is unreadable");
        AppError::InvalidCredentials
    })?;
    if !password_ok {
        tracing::warn!(email = %email, "Failed admin login");
        return Err(AppError::InvalidCredentials);
    }

    if let Some(secret) = &admin.totp_secret {
        let code = req
            .code
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .ok_or(AppError::TwoFactorRequired)?;
        if !totp::verify_code(secret, code, &state.config.totp_issuer, &admin.email)? {
            tracing::warn!(admin_id = admin.id, "Wrong two-factor code at login");
            return Err(AppError::InvalidTwoFactorCode);
        }
    }

    let (token, expires_in) = auth::issue_token(&state.config, &admin.email)
        .map_err(|e| AppError::Internal(format!("token signing failed: {e}")))?;
    let headers = set_cookie(&auth::session_cookie(&state.config, &token, expires_in))?;

    tracing::info!(admin_id = admin.id, two_factor = admin.is_2fa_enabled(), "Admin logged in");
    Ok((
        headers,
        Json(LoginResponse {
            access_token: token,
            token_type: "bearer".to_string(),
            expires_in,
            admin_info: admin.profile(),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/admin/me",
    tag = "admin",
    responses(
        (status = 200, description = "Current admin", body = AdminProfile),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(AdminSession(admin): AdminSession) -> Json<AdminProfile> {
    Json(admin.profile())
}

/// logout
///
/// [Admin Route] Expires the session cookie. Bearer tokens stay valid until
/// they expire on their own.
#[utoipa::path(
    post,
    path = "/admin/logout",
    tag = "admin",
    responses((status = 200, description = "Cookie cleared", body = MessageResponse))
)]
pub async fn logout(State(state): State<AppState>) -> AppResult<(HeaderMap, Json<MessageResponse>)> {
    let headers = set_cookie(&auth::clear_session_cookie(&state.config))?;
    Ok((headers, Json(MessageResponse { message: "Logged out".to_string() })))
}

#[utoipa::path(
    get,
    path = "/admin/dashboard",
    tag = "admin",
    responses((status = 200, description = "Dashboard counters", body = DashboardStats))
)]
pub async fn dashboard(State(state): State<AppState>) -> AppResult<Json<DashboardStats>> {
    Ok(Json(state.repo.dashboard_stats(Utc::now()).await?))
}

/// setup_two_factor
///
/// [Admin Route] Returns a fresh secret with its provisioning URL and QR
/// code. Nothing is saved until `/admin/2fa/enable` confirms a code.
#[utoipa::path(
    post,
    path = "/admin/2fa/setup",
    tag = "admin",
    responses((status = 200, description = "Enrollment material", body = TwoFactorSetupResponse))
)]
pub async fn setup_two_factor(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
) -> AppResult<Json<TwoFactorSetupResponse>> {
    let setup = totp::enrollment(&state.config.totp_issuer, &admin.email)?;
    Ok(Json(setup))
}

#[utoipa::path(
    post,
    path = "/admin/2fa/enable",
    tag = "admin",
    request_body = EnableTwoFactorRequest,
    responses(
        (status = 200, description = "Two-factor login enabled", body = AdminProfile),
        (status = 400, description = "INVALID_TWO_FACTOR_CODE")
    )
)]
pub async fn enable_two_factor(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    ValidatedJson(req): ValidatedJson<EnableTwoFactorRequest>,
) -> AppResult<Json<AdminProfile>> {
    let secret = req.secret.trim().to_uppercase();
    if !totp::verify_code(&secret, &req.code, &state.config.totp_issuer, &admin.email)? {
        return Err(AppError::TwoFactorSetupRejected);
    }

    if !state.repo.set_admin_totp_secret(admin.id, Some(secret.clone())).await? {
        return Err(AppError::Forbidden);
    }
    tracing::info!(admin_id = admin.id, "Two-factor login enabled");

    let admin = Admin { totp_secret: Some(secret), ..admin };
    Ok(Json(admin.profile()))
}

#[utoipa::path(
    post,
    path = "/admin/2fa/disable",
    tag = "admin",
    request_body = DisableTwoFactorRequest,
    responses(
        (status = 200, description = "Two-factor login disabled", body = AdminProfile),
        (status = 400, description = "Two-factor login is not enabled"),
        (status = 401, description = "INVALID_TWO_FACTOR_CODE")
    )
)]
pub async fn disable_two_factor(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    ValidatedJson(req): ValidatedJson<DisableTwoFactorRequest>,
) -> AppResult<Json<AdminProfile>> {
    let secret = admin
        .totp_secret
        .as_deref()
        .ok_or_else(|| AppError::BadRequest("Two-factor login is not enabled".to_string()))?;

    if !totp::verify_code(secret, &req.code, &state.config.totp_issuer, &admin.email)? {
        tracing::warn!(admin_id = admin.id, "Wrong two-factor code on disable");
        return Err(AppError::InvalidTwoFactorCode);
    }

    if !state.repo.set_admin_totp_secret(admin.id, None).await? {
        return Err(AppError::Forbidden);
    }
    tracing::info!(admin_id = admin.id, "Two-factor login disabled");

    let admin = Admin { totp_secret: None, ..admin };
    Ok(Json(admin.profile()))
}
