use thiserror::Error;

use crate::models::Verdict;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input for '{field}': '{value}'. Please enter valid numbers only")]
    InvalidInput { field: &'static str, value: String },

    #[error("Storage unavailable while {action}: {source}")]
    StorageUnavailable {
        action: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Verdict '{supplied}' contradicts the computed verdict '{computed}'")]
    VerdictMismatch { supplied: Verdict, computed: Verdict },

    #[error("Report timestamp must not be empty")]
    InvalidTimestamp,

    #[error("Stored report {id} has unknown status '{status}'")]
    CorruptRecord { id: i64, status: String },

    #[error("Stored report {id} has no value in column '{column}'")]
    CorruptRow { id: i64, column: &'static str },

    #[cfg(feature = "cli")]
    #[error("Error reading from stdin: {source}")]
    ReadStdin {
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "cli")]
    #[error("Error reading file '{path}': {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "cli")]
    #[error("Invalid JSON for --inputs-json: {source}")]
    ParseInputsJson {
        #[source]
        source: serde_json::Error,
    },

    #[cfg(feature = "cli")]
    #[error("Invalid JSON in input document: {source}")]
    ParseCmdInputJson {
        #[source]
        source: serde_json::Error,
    },

    #[cfg(feature = "cli")]
    #[error("Could not serialize output to JSON: {source}")]
    SerializeOutput {
        #[source]
        source: serde_json::Error,
    },

    #[cfg(feature = "cli")]
    #[error("Could not write report to '{path}': {source}")]
    WriteReport {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "cli")]
    #[error("Missing input data: provide all nine readings, --input or --inputs-json")]
    MissingInputData,

    #[cfg(feature = "cli")]
    #[error("Missing reading for --{0}")]
    MissingReading(&'static str),
}

impl AppError {
    /// True when the durable store could not complete the operation.
    pub fn is_storage_unavailable(&self) -> bool {
        matches!(self, AppError::StorageUnavailable { .. })
    }
}
