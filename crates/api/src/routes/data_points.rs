//! Data Point Routes

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use storage::DataPoint;
use tracing::{info, warn};

use super::json_body;
use crate::error::{ApiError, ApiResult};
use crate::SharedState;

/// Response for CSV uploads
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvUploadResponse {
    pub created: Vec<DataPoint>,
    /// Rows dropped for a column-count mismatch
    pub skipped: usize,
}

/// # GET /api/data-points
pub async fn list_data_points(State(state): State<SharedState>) -> ApiResult<Json<Vec<DataPoint>>> {
    Ok(Json(state.repository.list_data_points()?))
}

/// # POST /api/data-points
pub async fn create_data_point(
    State(state): State<SharedState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<DataPoint>)> {
    let fields = state
        .validator
        .validate_data_point(&json_body(payload)?)
        .inspect_err(|_| metrics::counter!("dashboard_validation_failures_total").increment(1))?;

    let point = state.repository.create_data_point(fields)?;
    metrics::counter!("dashboard_data_points_created_total").increment(1);

    info!(id = point.id, category = %point.category, "Data point created");
    Ok((StatusCode::CREATED, Json(point)))
}

/// # POST /api/data-points/csv
///
/// All-or-nothing: any unparseable row rejects the whole upload.
pub async fn upload_csv(
    State(state): State<SharedState>,
    body: String,
) -> ApiResult<(StatusCode, Json<CsvUploadResponse>)> {
    let batch = state.validator.parse_csv(&body);

    if batch.skipped > 0 {
        metrics::counter!("dashboard_csv_rows_skipped_total").increment(batch.skipped as u64);
    }

    if !batch.is_clean() {
        warn!("Rejected CSV upload with {} invalid row(s)", batch.errors.len());
        metrics::counter!("dashboard_validation_failures_total").increment(1);
        return Err(ApiError::Csv(batch.errors));
    }

    let created = state.repository.create_data_points(batch.rows)?;
    metrics::counter!("dashboard_data_points_created_total").increment(created.len() as u64);

    info!(
        "CSV upload stored {} data points ({} skipped)",
        created.len(),
        batch.skipped
    );
    Ok((
        StatusCode::CREATED,
        Json(CsvUploadResponse {
            created,
            skipped: batch.skipped,
        }),
    ))
}
