//! Campaign report bundling all three analyses

use crate::aggregate::{aggregate_by_category, CategoryTotal};
use crate::statistics::{compute_summary_statistics, SummaryStatistics};
use crate::trend::{classify_trends, TrendPoint};
use serde::Serialize;
use storage::DataPoint;
use tracing::debug;

/// Statistics, trends, and category totals for one snapshot of data points
#[derive(Debug, Clone, Serialize)]
pub struct CampaignReport {
    pub summary: SummaryStatistics,
    pub trends: Vec<TrendPoint>,
    pub categories: Vec<CategoryTotal>,
}

impl CampaignReport {
    pub fn build(points: &[DataPoint]) -> Self {
        debug!("Building campaign report over {} points", points.len());
        Self {
            summary: compute_summary_statistics(points),
            trends: classify_trends(points),
            categories: aggregate_by_category(points),
        }
    }
}

/// Points belonging to one campaign, in input order
pub fn points_for_campaign(points: &[DataPoint], campaign_id: i64) -> Vec<DataPoint> {
    points
        .iter()
        .filter(|p| p.campaign_id == Some(campaign_id))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trend::Trend;
    use chrono::{TimeZone, Utc};

    fn point(campaign_id: Option<i64>, day: u32, value: i64, category: &str) -> DataPoint {
        DataPoint {
            id: day as i64,
            campaign_id,
            value,
            timestamp: Utc.with_ymd_and_hms(2024, 6, day, 0, 0, 0).unwrap(),
            category: category.to_string(),
        }
    }

    #[test]
    fn test_report_combines_analyses() {
        let points = vec![
            point(Some(1), 1, 100, "social"),
            point(Some(1), 2, 150, "email"),
            point(Some(1), 3, 150, "social"),
        ];
        let report = CampaignReport::build(&points);

        assert_eq!(report.summary.total, 400);
        assert_eq!(report.trends.len(), 2);
        assert_eq!(report.trends[0].trend, Trend::Increasing);
        assert_eq!(report.trends[1].trend, Trend::Stable);
        assert_eq!(report.categories[0].value, 250);
    }

    #[test]
    fn test_campaign_filter() {
        let points = vec![
            point(Some(1), 1, 10, "a"),
            point(Some(2), 2, 20, "a"),
            point(None, 3, 30, "a"),
            point(Some(1), 4, 40, "b"),
        ];

        let selected = points_for_campaign(&points, 1);
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[1].value, 40);
        assert!(points_for_campaign(&points, 9).is_empty());
    }

    #[test]
    fn test_empty_report() {
        let report = CampaignReport::build(&[]);
        assert!(!report.summary.has_data());
        assert!(report.trends.is_empty());
        assert!(report.categories.is_empty());
    }
}
