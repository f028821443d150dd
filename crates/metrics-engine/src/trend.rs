//! Trend Classification
//!
//! Each point is compared with its chronological predecessor. There is no
//! smoothing or windowing: a trend is purely a two-point percent change.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use storage::DataPoint;

/// Percent change above which a step counts as a move
pub const TREND_THRESHOLD_PCT: f64 = 5.0;

/// Direction of a single step in the series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

impl Trend {
    /// Classify a percent change
    pub fn from_change(change: f64) -> Self {
        if change > TREND_THRESHOLD_PCT {
            Trend::Increasing
        } else if change < -TREND_THRESHOLD_PCT {
            Trend::Decreasing
        } else {
            Trend::Stable
        }
    }

    /// Classify a step between two values
    ///
    /// From a zero base the percent change is undefined, so the sign of the
    /// new value decides.
    pub fn between(prev: i64, curr: i64) -> Self {
        match percent_change(prev, curr) {
            Some(change) => Trend::from_change(change),
            None if curr > 0 => Trend::Increasing,
            None if curr < 0 => Trend::Decreasing,
            None => Trend::Stable,
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Trend::Increasing => "increasing",
            Trend::Decreasing => "decreasing",
            Trend::Stable => "stable",
        };
        f.write_str(label)
    }
}

/// One classified step, stamped with the later point's timestamp
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub timestamp: DateTime<Utc>,
    pub trend: Trend,
    /// `None` when the previous value was zero
    pub change: Option<f64>,
}

/// `((curr - prev) / prev) * 100`, or `None` when `prev` is zero
pub fn percent_change(prev: i64, curr: i64) -> Option<f64> {
    if prev == 0 {
        return None;
    }
    let prev = prev as f64;
    Some(((curr as f64 - prev) / prev) * 100.0)
}

/// Classify every consecutive pair of points in timestamp order
///
/// Points sharing a timestamp keep their input order. Yields `n - 1`
/// records, or none for fewer than two points.
pub fn classify_trends(points: &[DataPoint]) -> Vec<TrendPoint> {
    let mut ordered: Vec<&DataPoint> = points.iter().collect();
    ordered.sort_by_key(|p| p.timestamp);

    ordered
        .windows(2)
        .map(|pair| {
            let (prev, curr) = (pair[0], pair[1]);
            TrendPoint {
                timestamp: curr.timestamp,
                trend: Trend::between(prev.value, curr.value),
                change: percent_change(prev.value, curr.value),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn point(id: i64, hour: u32, value: i64) -> DataPoint {
        DataPoint {
            id,
            campaign_id: Some(1),
            value,
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap(),
            category: "social".to_string(),
        }
    }

    fn single_step(prev: i64, curr: i64) -> TrendPoint {
        let trends = classify_trends(&[point(1, 1, prev), point(2, 2, curr)]);
        assert_eq!(trends.len(), 1);
        trends[0].clone()
    }

    #[test]
    fn test_increasing() {
        let step = single_step(100, 106);
        assert_eq!(step.trend, Trend::Increasing);
        assert!((step.change.unwrap() - 6.0).abs() < 1e-9);
        assert_eq!(step.timestamp, Utc.with_ymd_and_hms(2024, 1, 1, 2, 0, 0).unwrap());
    }

    #[test]
    fn test_decreasing() {
        let step = single_step(100, 94);
        assert_eq!(step.trend, Trend::Decreasing);
        assert!((step.change.unwrap() + 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_stable() {
        let step = single_step(100, 102);
        assert_eq!(step.trend, Trend::Stable);
        assert!((step.change.unwrap() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        assert_eq!(Trend::from_change(5.0), Trend::Stable);
        assert_eq!(Trend::from_change(-5.0), Trend::Stable);
        assert_eq!(Trend::from_change(5.0001), Trend::Increasing);
    }

    #[test]
    fn test_zero_base() {
        let up = single_step(0, 10);
        assert_eq!(up.trend, Trend::Increasing);
        assert_eq!(up.change, None);

        assert_eq!(single_step(0, 0).trend, Trend::Stable);
        assert_eq!(single_step(0, -3).trend, Trend::Decreasing);
    }

    #[test]
    fn test_negative_base_keeps_raw_formula() {
        // (-50 - -100) / -100 * 100 = -50
        let step = single_step(-100, -50);
        assert!((step.change.unwrap() + 50.0).abs() < 1e-9);
        assert_eq!(step.trend, Trend::Decreasing);
    }

    #[test]
    fn test_sorts_by_timestamp() {
        let points = vec![point(1, 3, 120), point(2, 1, 100), point(3, 2, 200)];
        let trends = classify_trends(&points);

        assert_eq!(trends.len(), 2);
        // 100 -> 200 -> 120
        assert_eq!(trends[0].trend, Trend::Increasing);
        assert_eq!(trends[1].trend, Trend::Decreasing);
        assert!((trends[1].change.unwrap() + 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_equal_timestamps_keep_input_order() {
        let points = vec![point(1, 1, 100), point(2, 1, 50), point(3, 1, 100)];
        let trends = classify_trends(&points);

        assert_eq!(trends[0].trend, Trend::Decreasing);
        assert_eq!(trends[1].trend, Trend::Increasing);
    }

    #[test]
    fn test_short_input() {
        assert!(classify_trends(&[]).is_empty());
        assert!(classify_trends(&[point(1, 1, 5)]).is_empty());
    }

    #[test]
    fn test_serialized_labels() {
        let json = serde_json::to_value(single_step(0, 4)).unwrap();
        assert_eq!(json["trend"], "increasing");
        assert!(json["change"].is_null());
        assert_eq!(Trend::Stable.to_string(), "stable");
    }
}
