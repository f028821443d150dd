//! Prometheus exposition

use axum::extract::State;

use crate::error::{ApiError, ApiResult};
use crate::SharedState;

/// # GET /metrics
pub async fn render_metrics(State(state): State<SharedState>) -> ApiResult<String> {
    state
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .ok_or_else(|| ApiError::NotFound("metrics exporter is not installed".to_string()))
}
