//! Route handlers

use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde_json::Value;

use crate::error::{ApiError, ApiResult};

pub mod account;
pub mod analysis;
pub mod data_points;
pub mod telemetry;

/// Unwrap a JSON body, turning extractor rejections into 400s
fn json_body(payload: Result<Json<Value>, JsonRejection>) -> ApiResult<Value> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}
