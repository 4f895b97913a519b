use chrono::{DateTime, Local};
use serde::Serialize;

use crate::adapters::sqlite::ReportStore;
use crate::error::AppError;
use crate::models::Measurement;
use crate::quality::classifier::{Assessment, assess};

/// Timestamp format stored in the `date` column and printed on reports.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Outcome of a saved submission.
#[derive(Serialize, Debug, Clone)]
pub struct Submission {
    pub id: i64,
    pub timestamp: String,
    pub measurement: Measurement,
    pub assessment: Assessment,
}

pub fn format_timestamp(at: &DateTime<Local>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Current local time in `TIMESTAMP_FORMAT`.
pub fn now_timestamp() -> String {
    format_timestamp(&Local::now())
}

/// Classify `measurement` and persist it under `timestamp`.
///
/// Either both steps succeed or nothing is stored. On a storage failure the
/// caller can still show the verdict by calling `assess` itself.
pub fn submit(
    store: &ReportStore,
    measurement: &Measurement,
    timestamp: &str,
) -> Result<Submission, AppError> {
    measurement.ensure_finite()?;
    let assessment = assess(measurement);
    let id = store.append(measurement, assessment.verdict, timestamp)?;
    Ok(Submission {
        id,
        timestamp: timestamp.to_string(),
        measurement: *measurement,
        assessment,
    })
}
