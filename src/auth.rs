use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header, request::Parts},
};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{
    config::AppConfig,
    error::AppError,
    models::Admin,
    repository::RepositoryState,
};

/// Name of the cookie carrying the admin session token.
pub const SESSION_COOKIE: &str = "admin_token";

/// Claims
///
/// Payload of an admin session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the admin's email address.
    pub sub: String,
    /// Issued at (unix seconds).
    pub iat: usize,
    /// Expiration (unix seconds). Checked on every request.
    pub exp: usize,
}

// --- Passwords ---

/// Hashes a password with Argon2id and a random salt, returning a PHC string.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// verify_password
///
/// `Ok(false)` for a wrong password. A stored hash that cannot be parsed is
/// an error, not a mismatch.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

pub fn validate_password_strength(password: &str, min_length: usize) -> Result<(), String> {
    if password.chars().count() < min_length {
        return Err(format!("Password must be at least {min_length} characters long"));
    }
    Ok(())
}

// --- Tokens ---

/// issue_token
///
/// Signs a session token for `email` with the configured secret, algorithm
/// and lifetime. Returns the token and its lifetime in seconds.
pub fn issue_token(
    config: &AppConfig,
    email: &str,
) -> Result<(String, i64), jsonwebtoken::errors::Error> {
    let now = Utc::now().timestamp();
    let ttl = config.access_token_ttl_seconds();
    let claims = Claims {
        sub: email.to_string(),
        iat: now as usize,
        exp: (now + ttl) as usize,
    };
    let token = encode(
        &Header::new(config.jwt_algorithm),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )?;
    Ok((token, ttl))
}

/// Verifies signature, algorithm and expiry, returning the claims.
pub fn decode_token(
    config: &AppConfig,
    token: &str,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(config.jwt_algorithm);
    validation.validate_exp = true;
    validation.required_spec_claims = ["exp", "sub"].iter().map(|c| c.to_string()).collect();

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )?;
    Ok(data.claims)
}

// --- Cookies ---

/// Set-Cookie value that stores `token` for `max_age` seconds.
pub fn session_cookie(config: &AppConfig, token: &str, max_age: i64) -> String {
    let mut cookie =
        format!("{SESSION_COOKIE}={token}; HttpOnly; Path=/; SameSite=Lax; Max-Age={max_age}");
    if config.is_production() {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Set-Cookie value that makes the browser drop the session cookie.
pub fn clear_session_cookie(config: &AppConfig) -> String {
    session_cookie(config, "", 0)
}

/// token_from_headers
///
/// The `admin_token` cookie wins over an `Authorization: Bearer` header.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let from_cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string());

    from_cookie.or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
    })
}

/// AdminSession
///
/// The admin behind the current request. Taking it as a handler argument
/// makes the route admin-only:
///
/// * no token: 401
/// * bad signature, wrong algorithm, expired or malformed: 401
/// * valid token whose subject is no longer an admin: 403
///
/// An [`Admin`] already placed in the request extensions (by the admin
/// route layer) is reused without another lookup.
pub struct AdminSession(pub Admin);

impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(admin) = parts.extensions.get::<Admin>() {
            return Ok(AdminSession(admin.clone()));
        }

        let repo = RepositoryState::from_ref(state);
        let config = AppConfig::from_ref(state);

        let token = token_from_headers(&parts.headers).ok_or(AppError::Unauthorized)?;

        let claims = decode_token(&config, &token).map_err(|e| {
            tracing::warn!(error = %e, "Rejected admin token");
            AppError::Unauthorized
        })?;

        let admin = repo
            .get_admin_by_email(&claims.sub)
            .await?
            .ok_or(AppError::Forbidden)?;

        Ok(AdminSession(admin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use jsonwebtoken::Algorithm;

    #[test]
    fn hash_and_verify() {
        let hash = hash_password("correct-horse-battery").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct-horse-battery", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
        assert!(verify_password("x", "not-a-phc-string").is_err());
    }

    #[test]
    fn token_round_trip_keeps_email_subject() {
        let config = AppConfig::default();
        let (token, ttl) = issue_token(&config, "admin@ayzek.org").unwrap();
        assert_eq!(ttl, 30 * 60);

        let claims = decode_token(&config, &token).unwrap();
        assert_eq!(claims.sub, "admin@ayzek.org");
        assert_eq!(claims.exp - claims.iat, 1800);
    }

    #[test]
    fn token_from_other_secret_or_algorithm_is_rejected() {
        let config = AppConfig::default();
        let (token, _) = issue_token(&config, "admin@ayzek.org").unwrap();

        let other_secret = AppConfig { jwt_secret: "another-secret".into(), ..AppConfig::default() };
        assert!(decode_token(&other_secret, &token).is_err());

        let other_alg = AppConfig { jwt_algorithm: Algorithm::HS512, ..AppConfig::default() };
        assert!(decode_token(&other_alg, &token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = AppConfig { access_token_ttl_minutes: -5, ..AppConfig::default() };
        let (token, _) = issue_token(&config, "admin@ayzek.org").unwrap();
        assert!(decode_token(&AppConfig::default(), &token).is_err());
    }

    #[test]
    fn cookie_takes_precedence_over_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer from-header"));
        assert_eq!(token_from_headers(&headers).as_deref(), Some("from-header"));

        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark; admin_token=from-cookie"));
        assert_eq!(token_from_headers(&headers).as_deref(), Some("from-cookie"));
    }

    #[test]
    fn cookie_flags() {
        let local = session_cookie(&AppConfig::default(), "abc", 1800);
        assert_eq!(local, "admin_token=abc; HttpOnly; Path=/; SameSite=Lax; Max-Age=1800");

        let prod = AppConfig { env: crate::config::Env::Production, ..AppConfig::default() };
        assert!(session_cookie(&prod, "abc", 1800).ends_with("; Secure"));
        assert!(clear_session_cookie(&prod).contains("Max-Age=0"));
    }
}
