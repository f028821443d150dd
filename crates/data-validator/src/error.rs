//! Validation Error Types

use serde::ser::{Serialize, SerializeStruct, Serializer};
use thiserror::Error;

/// A single field-level violation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Payload is not a JSON object
    #[error("Expected a JSON object")]
    NotAnObject,

    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Field has the wrong JSON type
    #[error("{field}: expected {expected}, received {received}")]
    InvalidType {
        field: &'static str,
        expected: &'static str,
        received: &'static str,
    },

    /// Field has the right type but cannot be interpreted
    #[error("{field}: {reason}")]
    InvalidFormat { field: &'static str, reason: String },

    /// Value out of allowed range
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// String longer than allowed
    #[error("{field} must be at most {max} characters (got {len})")]
    TooLong {
        field: &'static str,
        max: usize,
        len: usize,
    },
}

impl ValidationError {
    /// Name of the offending field
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::NotAnObject => "",
            ValidationError::MissingField(field) => field,
            ValidationError::InvalidType { field, .. }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::TooLong { field, .. } => field,
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::NotAnObject => "not_an_object",
            ValidationError::MissingField(_) => "required",
            ValidationError::InvalidType { .. } => "invalid_type",
            ValidationError::InvalidFormat { .. } => "invalid_format",
            ValidationError::OutOfRange { .. } => "out_of_range",
            ValidationError::TooLong { .. } => "too_long",
        }
    }
}

impl Serialize for ValidationError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ValidationError", 3)?;
        state.serialize_field("field", self.field())?;
        state.serialize_field("code", self.code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Every violation found in one payload
#[derive(Debug, Clone, PartialEq, Error, serde::Serialize)]
#[serde(transparent)]
#[error("{} validation error(s): {}", .0.len(), summarize(.0))]
pub struct ValidationErrors(pub Vec<ValidationError>);

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn single(error: ValidationError) -> Self {
        Self(vec![error])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }
}
