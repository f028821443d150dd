//! Record Types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single timestamped, categorized observation tied to a campaign
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPoint {
    /// Assigned by the repository, starting at 1
    pub id: i64,
    /// Owning campaign (never checked for existence)
    pub campaign_id: Option<i64>,
    pub value: i64,
    pub timestamp: DateTime<Utc>,
    pub category: String,
}

/// Data point fields before an id has been assigned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDataPoint {
    pub campaign_id: Option<i64>,
    pub value: i64,
    pub timestamp: DateTime<Utc>,
    pub category: String,
}

impl NewDataPoint {
    pub(crate) fn with_id(self, id: i64) -> DataPoint {
        DataPoint {
            id,
            campaign_id: self.campaign_id,
            value: self.value,
            timestamp: self.timestamp,
            category: self.category,
        }
    }
}

/// Dashboard user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

/// Credentials submitted for registration or login
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_data_point_json_uses_camel_case() {
        let point = DataPoint {
            id: 3,
            campaign_id: Some(7),
            value: 42,
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            category: "email".to_string(),
        };

        let json = serde_json::to_value(&point).unwrap();
        assert_eq!(json["campaignId"], 7);
        assert_eq!(json["timestamp"], "2024-03-01T12:00:00Z");
    }

    #[test]
    fn test_user_hides_password_hash() {
        let user = User {
            id: 1,
            username: "ana".to_string(),
            password_hash: "salt$hash".to_string(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "ana");
    }
}
