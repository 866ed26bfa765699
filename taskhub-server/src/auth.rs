//! HTTP Basic authentication and password hashing.
//!
//! Credentials arrive as `Authorization: Basic base64(username:password)`
//! and are checked against the stored salted SHA-256 hash. The
//! [`AuthUser`] extractor resolves the request to a [`Principal`] so
//! every handler receives the caller identity as an explicit argument;
//! a missing or invalid credential rejects the request with 401 before
//! the handler runs.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::header;
use axum::http::request::Parts;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use sha2::{Digest, Sha256};
use taskhub_core::user::Principal;

use crate::http::{ApiError, AppState};

/// Number of random salt bytes per password hash.
const SALT_LEN: usize = 16;

/// Hashes a password with a fresh random salt.
///
/// Format: `v1$<hex salt>$<hex sha256(salt || password)>`.
#[must_use]
pub fn hash_password(password: &str) -> String {
    let salt: [u8; SALT_LEN] = rand::random();
    let digest = salted_digest(&salt, password);
    format!("v1${}${}", hex::encode(salt), hex::encode(digest))
}

/// Verifies a password against a stored hash string.
///
/// Returns `false` for a malformed hash rather than failing open.
#[must_use]
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.split('$');
    let (Some("v1"), Some(salt_hex), Some(digest_hex), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    let Ok(salt) = hex::decode(salt_hex) else {
        return false;
    };
    let Ok(expected) = hex::decode(digest_hex) else {
        return false;
    };
    salted_digest(&salt, password).as_slice() == expected.as_slice()
}

fn salted_digest(salt: &[u8], password: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().into()
}

/// Parses an `Authorization: Basic` header value into its credentials.
///
/// Returns `None` if the scheme is not Basic, the base64 is invalid,
/// or the decoded token is not `username:password`.
#[must_use]
pub fn parse_basic(header_value: &str) -> Option<(String, String)> {
    let token = header_value
        .strip_prefix("Basic ")
        .or_else(|| header_value.strip_prefix("basic "))?;
    let decoded = BASE64.decode(token.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

/// The authenticated principal of a request.
///
/// Extracting this from a request performs the Basic authentication
/// handshake against the account store.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Principal);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthenticated)?;

        let (username, password) =
            parse_basic(header_value).ok_or(ApiError::Unauthenticated)?;

        let user = state
            .accounts
            .verify_credentials(&username, &password)
            .await
            .ok_or(ApiError::Unauthenticated)?;

        Ok(Self(user.principal()))
    }
}
