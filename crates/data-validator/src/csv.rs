//! CSV batch ingestion
//!
//! Rows are positional: `value,category,timestamp,campaignId`. The first line
//! is a header whose column count fixes the expected row width. Rows of any
//! other width are skipped without error; rows of the right width that fail
//! to parse are reported with their 1-based line number.

use crate::error::ValidationError;
use crate::timestamp::parse_timestamp;
use crate::validator::Validator;
use serde::Serialize;
use storage::NewDataPoint;
use tracing::debug;

const VALUE: usize = 0;
const CATEGORY: usize = 1;
const TIMESTAMP: usize = 2;
const CAMPAIGN_ID: usize = 3;

/// A row that had the right width but did not parse
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowError {
    pub line: usize,
    pub errors: Vec<ValidationError>,
}

/// Outcome of parsing one CSV upload
#[derive(Debug, Clone, Default)]
pub struct CsvBatch {
    /// Rows ready to persist, in file order
    pub rows: Vec<NewDataPoint>,
    /// Non-blank rows dropped for a column-count mismatch
    pub skipped: usize,
    pub errors: Vec<RowError>,
}

impl CsvBatch {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

fn column<'a>(fields: &[&'a str], index: usize, name: &'static str) -> Result<&'a str, ValidationError> {
    fields
        .get(index)
        .map(|f| f.trim())
        .ok_or(ValidationError::MissingField(name))
}

fn parse_integer(field: &'static str, raw: &str) -> Result<i64, ValidationError> {
    raw.parse::<i64>().map_err(|_| ValidationError::InvalidFormat {
        field,
        reason: format!("'{}' is not an integer", raw),
    })
}

impl Validator {
    /// Parse a CSV upload into data points
    pub fn parse_csv(&self, text: &str) -> CsvBatch {
        let mut lines = text.split('\n');
        let Some(header) = lines.next() else {
            return CsvBatch::default();
        };
        let width = header.split(',').count();

        let mut batch = CsvBatch::default();
        for (offset, line) in lines.enumerate() {
            let line_no = offset + 2;
            let fields: Vec<&str> = line.split(',').collect();

            if fields.len() != width {
                if !line.trim().is_empty() {
                    debug!(
                        "Skipping CSV line {}: {} columns, expected {}",
                        line_no,
                        fields.len(),
                        width
                    );
                    batch.skipped += 1;
                }
                continue;
            }

            match self.parse_row(&fields) {
                Ok(point) => batch.rows.push(point),
                Err(errors) => batch.errors.push(RowError {
                    line: line_no,
                    errors,
                }),
            }
        }

        debug!(
            "Parsed CSV: {} rows, {} skipped, {} errors",
            batch.rows.len(),
            batch.skipped,
            batch.errors.len()
        );
        batch
    }

    fn parse_row(&self, fields: &[&str]) -> Result<NewDataPoint, Vec<ValidationError>> {
        let value = column(fields, VALUE, "value")
            .and_then(|raw| parse_integer("value", raw))
            .and_then(|v| self.validate_value(v));
        let category = column(fields, CATEGORY, "category").and_then(|c| self.validate_category(c));
        let timestamp = column(fields, TIMESTAMP, "timestamp").and_then(|raw| {
            parse_timestamp(raw).map_err(|reason| ValidationError::InvalidFormat {
                field: "timestamp",
                reason,
            })
        });
        let campaign_id = column(fields, CAMPAIGN_ID, "campaignId").and_then(|raw| {
            if raw.is_empty() {
                Ok(None)
            } else {
                parse_integer("campaignId", raw).map(Some)
            }
        });

        match (value, category, timestamp, campaign_id) {
            (Ok(value), Ok(category), Ok(timestamp), Ok(campaign_id)) => Ok(NewDataPoint {
                campaign_id,
                value,
                timestamp,
                category,
            }),
            (value, category, timestamp, campaign_id) => Err([
                value.err(),
                category.err(),
                timestamp.err(),
                campaign_id.err(),
            ]
            .into_iter()
            .flatten()
            .collect()),
        }
    }
}
