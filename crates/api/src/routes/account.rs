//! Account Routes

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Serialize;
use serde_json::Value;
use storage::User;
use tracing::info;

use super::json_body;
use crate::auth::{hash_password, verify_password, CurrentUser};
use crate::error::{ApiError, ApiResult};
use crate::SharedState;

/// Issued on register and login
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub user: User,
}

/// # POST /api/register
pub async fn register(
    State(state): State<SharedState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SessionResponse>)> {
    let credentials = state.validator.validate_credentials(&json_body(payload)?)?;

    let user = state
        .repository
        .create_user(&credentials.username, hash_password(&credentials.password))?;
    let token = state.sessions.create(user.id)?;

    info!(user_id = user.id, "Registered user {}", user.username);
    Ok((StatusCode::CREATED, Json(SessionResponse { token, user })))
}

/// # POST /api/login
pub async fn login(
    State(state): State<SharedState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<SessionResponse>> {
    let credentials = state.validator.validate_credentials(&json_body(payload)?)?;

    let user = state
        .repository
        .get_user_by_username(&credentials.username)?
        .filter(|user| verify_password(&credentials.password, &user.password_hash))
        .ok_or_else(|| {
            metrics::counter!("dashboard_auth_failures_total").increment(1);
            ApiError::Unauthorized
        })?;
    let token = state.sessions.create(user.id)?;

    info!(user_id = user.id, "User {} logged in", user.username);
    Ok(Json(SessionResponse { token, user }))
}

/// # POST /api/logout
pub async fn logout(
    State(state): State<SharedState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<StatusCode> {
    state.sessions.revoke(&user.token)?;
    info!(user_id = user.id, "User {} logged out", user.username);
    Ok(StatusCode::NO_CONTENT)
}

/// # GET /api/user
pub async fn current_user(Extension(user): Extension<CurrentUser>) -> Json<CurrentUser> {
    Json(user)
}
