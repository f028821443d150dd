//! Campaign Metrics Engine
//!
//! Pure functions over borrowed snapshots of data points: summary statistics,
//! chronological trend classification, and per-category totals.

mod aggregate;
mod report;
mod statistics;
mod trend;

pub use aggregate::{aggregate_by_category, CategoryTotal};
pub use report::{points_for_campaign, CampaignReport};
pub use statistics::{compute_summary_statistics, SummaryStatistics};
pub use trend::{classify_trends, percent_change, Trend, TrendPoint, TREND_THRESHOLD_PCT};
