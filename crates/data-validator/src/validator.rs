//! Payload Validator

use crate::error::{ValidationError, ValidationErrors};
use crate::timestamp::parse_timestamp;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use storage::{NewDataPoint, NewUser};
use tracing::debug;

/// Validation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Maximum category label length (characters)
    pub max_category_len: usize,
    /// Inclusive bounds for `value`; unbounded when absent
    pub value_range: Option<(i64, i64)>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_category_len: 255,
            value_range: None,
        }
    }
}

/// Validator for incoming data point and credential payloads
#[derive(Debug, Clone)]
pub struct Validator {
    config: ValidationConfig,
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "float",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn require<'a>(obj: &'a Map<String, Value>, field: &'static str) -> Result<&'a Value, ValidationError> {
    obj.get(field).ok_or(ValidationError::MissingField(field))
}

fn as_integer(field: &'static str, value: &Value) -> Result<i64, ValidationError> {
    let invalid = || ValidationError::InvalidType {
        field,
        expected: "integer",
        received: json_type(value),
    };

    let Value::Number(n) = value else {
        return Err(invalid());
    };

    if let Some(i) = n.as_i64() {
        return Ok(i);
    }

    let overflow = || ValidationError::InvalidFormat {
        field,
        reason: "does not fit in a 64-bit signed integer".to_string(),
    };
    if n.is_u64() {
        return Err(overflow());
    }

    // 12.0 is still an integer
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 => {
            if f >= i64::MIN as f64 && f < i64::MAX as f64 {
                Ok(f as i64)
            } else {
                Err(overflow())
            }
        }
        _ => Err(invalid()),
    }
}

fn as_str<'a>(field: &'static str, value: &'a Value) -> Result<&'a str, ValidationError> {
    value.as_str().ok_or_else(|| ValidationError::InvalidType {
        field,
        expected: "string",
        received: json_type(value),
    })
}

fn non_empty<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    if value.is_empty() {
        Err(ValidationError::InvalidFormat {
            field,
            reason: "must not be empty".to_string(),
        })
    } else {
        Ok(value)
    }
}

impl Validator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Check `value` against the configured range
    pub fn validate_value(&self, value: i64) -> Result<i64, ValidationError> {
        match self.config.value_range {
            Some((min, max)) if value < min || value > max => Err(ValidationError::OutOfRange {
                field: "value",
                value,
                min,
                max,
            }),
            _ => Ok(value),
        }
    }

    /// Check a category label against the configured length
    pub fn validate_category(&self, category: &str) -> Result<String, ValidationError> {
        let len = category.chars().count();
        if len > self.config.max_category_len {
            Err(ValidationError::TooLong {
                field: "category",
                max: self.config.max_category_len,
                len,
            })
        } else {
            Ok(category.to_string())
        }
    }

    /// Validate a data point payload, collecting every violation
    pub fn validate_data_point(&self, payload: &Value) -> Result<NewDataPoint, ValidationErrors> {
        let Some(obj) = payload.as_object() else {
            return Err(ValidationErrors::single(ValidationError::NotAnObject));
        };

        let value = require(obj, "value")
            .and_then(|v| as_integer("value", v))
            .and_then(|v| self.validate_value(v));
        let category = require(obj, "category")
            .and_then(|v| as_str("category", v))
            .and_then(|s| self.validate_category(s));
        let timestamp = require(obj, "timestamp")
            .and_then(|v| as_str("timestamp", v))
            .and_then(|s| {
                parse_timestamp(s).map_err(|reason| ValidationError::InvalidFormat {
                    field: "timestamp",
                    reason,
                })
            });
        let campaign_id = match obj.get("campaignId") {
            None | Some(Value::Null) => Ok(None),
            Some(v) => as_integer("campaignId", v).map(Some),
        };

        match (value, category, timestamp, campaign_id) {
            (Ok(value), Ok(category), Ok(timestamp), Ok(campaign_id)) => Ok(NewDataPoint {
                campaign_id,
                value,
                timestamp,
                category,
            }),
            (value, category, timestamp, campaign_id) => {
                let errors: Vec<ValidationError> = [
                    value.err(),
                    category.err(),
                    timestamp.err(),
                    campaign_id.err(),
                ]
                .into_iter()
                .flatten()
                .collect();
                debug!("Rejected data point payload: {} violation(s)", errors.len());
                Err(ValidationErrors(errors))
            }
        }
    }

    /// Validate a register/login payload
    pub fn validate_credentials(&self, payload: &Value) -> Result<NewUser, ValidationErrors> {
        let Some(obj) = payload.as_object() else {
            return Err(ValidationErrors::single(ValidationError::NotAnObject));
        };

        let username = require(obj, "username")
            .and_then(|v| as_str("username", v))
            .and_then(|s| non_empty("username", s));
        let password = require(obj, "password")
            .and_then(|v| as_str("password", v))
            .and_then(|s| non_empty("password", s));

        match (username, password) {
            (Ok(username), Ok(password)) => Ok(NewUser {
                username: username.to_string(),
                password: password.to_string(),
            }),
            (username, password) => Err(ValidationErrors(
                [username.err(), password.err()].into_iter().flatten().collect(),
            )),
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn test_valid_payload() {
        let validator = Validator::default();
        let point = validator
            .validate_data_point(&json!({
                "value": 120,
                "category": "social",
                "timestamp": "2024-02-01T09:00:00Z",
                "campaignId": 4
            }))
            .unwrap();

        assert_eq!(point.value, 120);
        assert_eq!(point.category, "social");
        assert_eq!(point.campaign_id, Some(4));
        assert_eq!(point.timestamp, Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap());
    }

    #[test]
    fn test_campaign_id_is_nullable() {
        let validator = Validator::default();
        let absent = json!({"value": 1, "category": "a", "timestamp": "2024-01-01"});
        let null = json!({"value": 1, "category": "a", "timestamp": "2024-01-01", "campaignId": null});

        assert_eq!(validator.validate_data_point(&absent).unwrap().campaign_id, None);
        assert_eq!(validator.validate_data_point(&null).unwrap().campaign_id, None);
    }

    #[test]
    fn test_collects_every_violation() {
        let validator = Validator::default();
        let errors = validator
            .validate_data_point(&json!({
                "value": "ten",
                "timestamp": "soon",
                "campaignId": 1.5
            }))
            .unwrap_err();

        let fields: Vec<&str> = errors.iter().map(|e| e.field()).collect();
        assert_eq!(fields, vec!["value", "category", "timestamp", "campaignId"]);
        assert_eq!(errors.0[0].code(), "invalid_type");
        assert_eq!(errors.0[1], ValidationError::MissingField("category"));
    }

    #[test]
    fn test_whole_floats_are_integers() {
        let validator = Validator::default();
        let point = validator
            .validate_data_point(&json!({"value": 12.0, "category": "a", "timestamp": "2024-01-01"}))
            .unwrap();
        assert_eq!(point.value, 12);

        assert!(validator
            .validate_data_point(&json!({"value": 12.5, "category": "a", "timestamp": "2024-01-01"}))
            .is_err());
    }

    #[test]
    fn test_oversized_integers_are_format_errors() {
        let validator = Validator::default();

        for value in [json!(u64::MAX), json!(1e20)] {
            let errors = validator
                .validate_data_point(&json!({"value": value, "category": "a", "timestamp": "2024-01-01"}))
                .unwrap_err();
            assert_eq!(errors.len(), 1);
            assert_eq!(errors.0[0].code(), "invalid_format");
            assert!(errors.0[0].to_string().contains("64-bit"));
        }
    }

    #[test]
    fn test_non_object_payload() {
        let validator = Validator::default();
        let errors = validator.validate_data_point(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(errors.0, vec![ValidationError::NotAnObject]);
    }

    #[test]
    fn test_configured_limits() {
        let validator = Validator::new(ValidationConfig {
            max_category_len: 5,
            value_range: Some((0, 100)),
        });

        assert!(validator.validate_value(100).is_ok());
        assert!(matches!(
            validator.validate_value(101),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(validator.validate_category("email").is_ok());
        assert!(matches!(
            validator.validate_category("display"),
            Err(ValidationError::TooLong { len: 7, .. })
        ));
    }

    #[test]
    fn test_credentials() {
        let validator = Validator::default();
        let user = validator
            .validate_credentials(&json!({"username": "ana", "password": "s3cret"}))
            .unwrap();
        assert_eq!(user.username, "ana");

        let errors = validator
            .validate_credentials(&json!({"username": "", "password": 5}))
            .unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
