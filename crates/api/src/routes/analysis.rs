//! Analysis Routes

use axum::extract::{Query, State};
use axum::Json;
use metrics_engine::{points_for_campaign, CampaignReport};
use serde::Deserialize;

use crate::error::ApiResult;
use crate::SharedState;

/// Query parameters for the analysis endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisQuery {
    /// Restrict to one campaign
    pub campaign_id: Option<i64>,
}

/// # GET /api/analysis
pub async fn get_analysis(
    State(state): State<SharedState>,
    Query(params): Query<AnalysisQuery>,
) -> ApiResult<Json<CampaignReport>> {
    let points = state.repository.list_data_points()?;
    let points = match params.campaign_id {
        Some(campaign_id) => points_for_campaign(&points, campaign_id),
        None => points,
    };

    Ok(Json(CampaignReport::build(&points)))
}
