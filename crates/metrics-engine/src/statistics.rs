//! Summary Statistics Computation

use serde::Serialize;
use storage::DataPoint;

/// Summary statistics over a set of values
///
/// For an empty set `mean`, `median`, `min`, and `max` are `NaN`
/// (serialized as JSON `null`) and `count`/`total` are zero.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SummaryStatistics {
    /// Number of values
    pub count: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Element at index `n / 2` of the ascending-sorted values
    ///
    /// For even counts this is the upper of the two middle values, not their average.
    pub median: f64,
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
    /// Sum of all values
    pub total: i64,
}

impl Default for SummaryStatistics {
    fn default() -> Self {
        Self {
            count: 0,
            mean: f64::NAN,
            median: f64::NAN,
            min: f64::NAN,
            max: f64::NAN,
            total: 0,
        }
    }
}

impl SummaryStatistics {
    /// Compute summary statistics from a slice of values
    pub fn compute(values: &[i64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let n = values.len();
        let total = values.iter().fold(0i64, |acc, &v| acc.saturating_add(v));
        let mean = values.iter().map(|&v| v as f64).sum::<f64>() / n as f64;

        let mut sorted = values.to_vec();
        sorted.sort_unstable();

        Self {
            count: n,
            mean,
            median: sorted[n / 2] as f64,
            min: sorted[0] as f64,
            max: sorted[n - 1] as f64,
            total,
        }
    }

    /// Whether any values contributed
    pub fn has_data(&self) -> bool {
        self.count > 0
    }
}

/// Summary statistics over the `value` of each data point
pub fn compute_summary_statistics(points: &[DataPoint]) -> SummaryStatistics {
    let values: Vec<i64> = points.iter().map(|p| p.value).collect();
    SummaryStatistics::compute(&values)
}
