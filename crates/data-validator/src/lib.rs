//! Data Validation and Ingestion
//!
//! Explicit validation of incoming data point payloads and CSV batch parsing.

mod csv;
mod error;
mod timestamp;
mod validator;

pub use csv::{CsvBatch, RowError};
pub use error::{ValidationError, ValidationErrors};
pub use timestamp::parse_timestamp;
pub use validator::{ValidationConfig, Validator};
