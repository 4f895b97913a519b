//! Append-only SQLite report store.
//!
//! One `water_reports` table, one row per submission. Rows are never updated
//! or deleted; ids come from `AUTOINCREMENT` and are strictly increasing.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{Connection, params};
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::models::{Measurement, Report, Verdict};
use crate::quality::classifier::classify;

/// Default database file, relative to the working directory.
pub const DEFAULT_DB_PATH: &str = "waterQualityTest.db";
/// Default SQLite busy timeout (ms).
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

// `extra` is a legacy column kept for compatibility with existing files; no
// operation reads or writes it.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS water_reports (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    date TEXT,
    pH REAL,
    tds REAL,
    turbidity REAL,
    hardness REAL,
    chlorine REAL,
    conductivity REAL,
    nitrates REAL,
    fluoride REAL,
    iron REAL,
    extra REAL,
    status TEXT
);
";

/// Reading columns in `Parameter::ALL` order.
const READING_COLUMNS: [&str; 9] = [
    "pH",
    "tds",
    "turbidity",
    "hardness",
    "chlorine",
    "conductivity",
    "nitrates",
    "fluoride",
    "iron",
];

#[derive(Clone, Debug)]
pub struct StoreConfig {
    pub path: PathBuf,
    pub busy_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DB_PATH),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

impl StoreConfig {
    pub fn at(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            ..Default::default()
        }
    }
}

/// Handle on the report database. Open once, pass by reference, drop to close.
pub struct ReportStore {
    conn: Connection,
}

fn unavailable(action: &'static str) -> impl FnOnce(rusqlite::Error) -> AppError {
    move |source| AppError::StorageUnavailable { action, source }
}

impl ReportStore {
    /// Open (creating if needed) the database file and ensure the schema exists.
    pub fn open(config: &StoreConfig) -> Result<Self, AppError> {
        debug!(path = %config.path.display(), "opening report store");
        let conn = Connection::open(&config.path).map_err(unavailable("opening the database"))?;
        conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))
            .map_err(unavailable("configuring the database"))?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Private in-memory database; gone when the store is dropped.
    pub fn open_in_memory() -> Result<Self, AppError> {
        let conn = Connection::open_in_memory().map_err(unavailable("opening the database"))?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Create the reports table if absent. Safe to call any number of times.
    pub fn init_schema(&self) -> Result<(), AppError> {
        self.conn
            .execute_batch(SCHEMA)
            .map_err(unavailable("creating the schema"))?;
        debug!("report schema ready");
        Ok(())
    }

    /// Persist one report and return its id.
    ///
    /// The verdict must be the one `classify` produces for `measurement`;
    /// anything else is rejected with `VerdictMismatch` and nothing is written.
    pub fn append(
        &self,
        measurement: &Measurement,
        verdict: Verdict,
        timestamp: &str,
    ) -> Result<i64, AppError> {
        if timestamp.trim().is_empty() {
            return Err(AppError::InvalidTimestamp);
        }
        measurement.ensure_finite()?;
        let computed = classify(measurement);
        if computed != verdict {
            warn!(supplied = %verdict, computed = %computed, "rejecting report with contradicting verdict");
            return Err(AppError::VerdictMismatch {
                supplied: verdict,
                computed,
            });
        }

        let m = measurement;
        self.conn
            .execute(
                "INSERT INTO water_reports
                    (date, pH, tds, turbidity, hardness, chlorine, conductivity, nitrates, fluoride, iron, status)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    timestamp,
                    m.ph,
                    m.tds,
                    m.turbidity,
                    m.hardness,
                    m.chlorine,
                    m.conductivity,
                    m.nitrates,
                    m.fluoride,
                    m.iron,
                    verdict.label(),
                ],
            )
            .map_err(unavailable("saving the report"))?;
        let id = self.conn.last_insert_rowid();
        info!(id, verdict = %verdict, "report saved");
        Ok(id)
    }

    /// Up to `limit` most recent reports, newest first.
    pub fn list_recent(&self, limit: usize) -> Result<Vec<Report>, AppError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, date, pH, tds, turbidity, hardness, chlorine, conductivity, nitrates, fluoride, iron, status
                 FROM water_reports ORDER BY id DESC LIMIT ?1",
            )
            .map_err(unavailable("reading report history"))?;
        let rows = stmt
            .query_map(params![limit], |row| {
                let mut values = [None; 9];
                for (i, v) in values.iter_mut().enumerate() {
                    *v = row.get::<_, Option<f64>>(i + 2)?;
                }
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    values,
                    row.get::<_, Option<String>>(11)?.unwrap_or_default(),
                ))
            })
            .map_err(unavailable("reading report history"))?;

        let mut reports = Vec::new();
        for row in rows {
            let (id, date, raw, status) = row.map_err(unavailable("reading report history"))?;
            let measurement = measurement_from_row(id, raw)?;
            let verdict =
                Verdict::from_label(&status).ok_or(AppError::CorruptRecord { id, status })?;
            reports.push(Report {
                id,
                date,
                measurement,
                verdict,
            });
        }
        Ok(reports)
    }

    /// Number of stored reports.
    pub fn count(&self) -> Result<u64, AppError> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM water_reports", [], |row| row.get(0))
            .map_err(unavailable("counting reports"))?;
        Ok(n.max(0) as u64)
    }
}

// NULL readings come from legacy rows where NaN was inserted.
fn measurement_from_row(id: i64, raw: [Option<f64>; 9]) -> Result<Measurement, AppError> {
    let mut values = [0.0; 9];
    for ((slot, value), column) in values.iter_mut().zip(raw).zip(READING_COLUMNS) {
        *slot = value.ok_or(AppError::CorruptRow { id, column })?;
    }
    Ok(Measurement::from_values(values))
}
