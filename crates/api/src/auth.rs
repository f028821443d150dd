//! Bearer-token authentication
//!
//! Passwords are stored as `salt$hex(sha256(salt || password))`.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::debug;
use uuid::Uuid;

use crate::error::ApiError;
use crate::SharedState;

/// The authenticated caller, inserted into request extensions
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    #[serde(skip)]
    pub token: String,
}

fn digest(salt: &str, password: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hasher.finalize().to_vec()
}

/// Compare without short-circuiting on the first differing byte
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Hash a password with a fresh random salt
pub fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    format!("{}${}", salt, hex::encode(digest(&salt, password)))
}

/// Check a password against a stored `salt$hash`
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt, expected)) = stored.split_once('$') else {
        return false;
    };
    match hex::decode(expected) {
        Ok(expected) => constant_time_eq(&digest(salt, password), &expected),
        Err(_) => false,
    }
}

/// Extract the token from `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn reject(reason: &'static str) -> ApiError {
    debug!("Rejected request: {}", reason);
    metrics::counter!("dashboard_auth_failures_total").increment(1);
    ApiError::Unauthorized
}

/// Middleware guarding routes that need a logged-in user
pub async fn require_auth(
    State(state): State<SharedState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers())
        .map(str::to_owned)
        .ok_or_else(|| reject("missing bearer token"))?;

    let user_id = state
        .sessions
        .resolve(&token)?
        .ok_or_else(|| reject("unknown or expired session"))?;

    let user = state
        .repository
        .get_user(user_id)?
        .ok_or_else(|| reject("session refers to missing user"))?;

    request.extensions_mut().insert(CurrentUser {
        id: user.id,
        username: user.username,
        token,
    });

    Ok(next.run(request).await)
}
