//! Category Aggregation

use serde::Serialize;
use std::collections::HashMap;
use storage::DataPoint;

/// Sum of values for one category label
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub value: i64,
}

/// Sum `value` per exact-match category, in order of first appearance
pub fn aggregate_by_category(points: &[DataPoint]) -> Vec<CategoryTotal> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<CategoryTotal> = Vec::new();

    for point in points {
        match index.get(point.category.as_str()) {
            Some(&slot) => {
                totals[slot].value = totals[slot].value.saturating_add(point.value);
            }
            None => {
                index.insert(point.category.as_str(), totals.len());
                totals.push(CategoryTotal {
                    category: point.category.clone(),
                    value: point.value,
                });
            }
        }
    }

    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn point(category: &str, value: i64) -> DataPoint {
        DataPoint {
            id: 0,
            campaign_id: None,
            value,
            timestamp: Utc::now(),
            category: category.to_string(),
        }
    }

    #[test]
    fn test_first_seen_order() {
        let totals = aggregate_by_category(&[point("a", 5), point("b", 3), point("a", 2)]);
        assert_eq!(
            totals,
            vec![
                CategoryTotal { category: "a".to_string(), value: 7 },
                CategoryTotal { category: "b".to_string(), value: 3 },
            ]
        );
    }

    #[test]
    fn test_case_sensitive() {
        let totals = aggregate_by_category(&[point("Email", 1), point("email", 2)]);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].category, "Email");
    }

    #[test]
    fn test_empty() {
        assert!(aggregate_by_category(&[]).is_empty());
    }
}
