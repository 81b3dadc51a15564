//! Time-based one-time codes for the admin second factor.
//!
//! Parameters match common authenticator apps: SHA1, 6 digits, 30 second
//! step, one step of clock skew either way.

use std::time::SystemTimeError;
use totp_rs::{Algorithm, Secret, TOTP};

use crate::{error::AppError, models::TwoFactorSetupResponse};

const DIGITS: usize = 6;
const SKEW: u8 = 1;
const STEP_SECONDS: u64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum TotpError {
    #[error("invalid two-factor secret: {0}")]
    InvalidSecret(String),
    #[error("QR code generation failed: {0}")]
    Qr(String),
    #[error("system clock error: {0}")]
    Clock(#[from] SystemTimeError),
}

impl From<TotpError> for AppError {
    fn from(err: TotpError) -> Self {
        match err {
            TotpError::InvalidSecret(msg) => AppError::BadRequest(msg),
            other => AppError::Internal(other.to_string()),
        }
    }
}

/// A fresh random base32 secret (160 bits).
pub fn generate_secret() -> String {
    Secret::generate_secret().to_encoded().to_string()
}

fn build(secret: &str, issuer: &str, account: &str) -> Result<TOTP, TotpError> {
    let bytes = Secret::Encoded(secret.trim().to_uppercase())
        .to_bytes()
        .map_err(|e| TotpError::InvalidSecret(format!("{e:?}")))?;
    TOTP::new(
        Algorithm::SHA1,
        DIGITS,
        SKEW,
        STEP_SECONDS,
        bytes,
        Some(issuer.to_string()),
        account.to_string(),
    )
    .map_err(|e| TotpError::InvalidSecret(e.to_string()))
}

/// enrollment
///
/// Generates a secret plus the `otpauth://` URL and a PNG QR code (as a
/// `data:` URL) for `account`. Nothing is stored until the admin confirms
/// with a valid code.
pub fn enrollment(issuer: &str, account: &str) -> Result<TwoFactorSetupResponse, TotpError> {
    let secret = generate_secret();
    let totp = build(&secret, issuer, account)?;
    let png = totp.get_qr_base64().map_err(TotpError::Qr)?;
    Ok(TwoFactorSetupResponse {
        otpauth_url: totp.get_url(),
        qr_code: format!("data:image/png;base64,{png}"),
        secret,
    })
}

/// verify_code
///
/// Checks `code` against `secret` at the current time. Whitespace inside the
/// code is ignored; anything that is not six digits is simply wrong.
pub fn verify_code(secret: &str, code: &str, issuer: &str, account: &str) -> Result<bool, TotpError> {
    let code: String = code.chars().filter(|c| !c.is_whitespace()).collect();
    if code.len() != DIGITS || !code.chars().all(|c| c.is_ascii_digit()) {
        return Ok(false);
    }
    let totp = build(secret, issuer, account)?;
    Ok(totp.check_current(&code)?)
}

/// The code an authenticator would show right now. Used by tests and the
/// admin CLI.
pub fn current_code(secret: &str, issuer: &str, account: &str) -> Result<String, TotpError> {
    Ok(build(secret, issuer, account)?.generate_current()?)
}
