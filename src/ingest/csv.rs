/// CSV dataset loader.
///
/// Required columns: `city`, `timestamp`, `temperature`, `season`.
/// Optional columns: `humidity`, `pressure`. Anything else is ignored.
///
/// The season column is required by this core: deriving seasons from
/// timestamps belongs to the surrounding system, so a file without it is an
/// input error rather than a silent derivation.
///
/// Every rejected row fails the whole load with an error naming the row —
/// loading half a dataset would corrupt every aggregate computed from it.

use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::model::{Dataset, Observation, Season, TempError};

/// Columns that must be present in the header row.
pub const REQUIRED_COLUMNS: [&str; 4] = ["city", "timestamp", "temperature", "season"];

/// One raw CSV row before validation. Optional columns deserialize to `None`
/// when the header does not carry them.
#[derive(Debug, Deserialize)]
struct RawRecord {
    city: String,
    timestamp: String,
    temperature: f64,
    #[serde(default)]
    humidity: Option<f64>,
    #[serde(default)]
    pressure: Option<f64>,
    season: String,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load a dataset from a CSV file on disk.
pub fn load_dataset_from_path(path: &Path) -> Result<Dataset, TempError> {
    let file = std::fs::File::open(path)
        .map_err(|e| TempError::Input(format!("cannot open {}: {}", path.display(), e)))?;
    load_dataset(file)
}

/// Load a dataset from any CSV reader.
///
/// Fails with `Input` on a missing required column or on the first
/// malformed row (empty city, unparseable timestamp/temperature, unknown
/// season label).
pub fn load_dataset<R: Read>(reader: R) -> Result<Dataset, TempError> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()
        .map_err(|e| TempError::Input(format!("reading CSV headers: {}", e)))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    for required in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == required) {
            return Err(TempError::Input(format!(
                "missing required column: {}",
                required
            )));
        }
    }

    let mut observations = Vec::new();
    for (i, record) in csv_reader.deserialize::<RawRecord>().enumerate() {
        // 1-based data row number, for error messages.
        let row = i + 1;
        let record =
            record.map_err(|e| TempError::Input(format!("row {}: {}", row, e)))?;
        observations.push(validate_record(record, row)?);
    }

    Ok(Dataset { observations })
}

fn validate_record(record: RawRecord, row: usize) -> Result<Observation, TempError> {
    let city = record.city.trim().to_string();
    if city.is_empty() {
        return Err(TempError::Input(format!("row {}: empty city", row)));
    }

    let timestamp = parse_timestamp(&record.timestamp).ok_or_else(|| {
        TempError::Input(format!(
            "row {}: unparseable timestamp '{}'",
            row, record.timestamp
        ))
    })?;

    if !record.temperature.is_finite() {
        return Err(TempError::Input(format!(
            "row {}: non-finite temperature",
            row
        )));
    }

    let season = Season::parse(&record.season).ok_or_else(|| {
        TempError::Input(format!(
            "row {}: unknown season label '{}'",
            row, record.season
        ))
    })?;

    Ok(Observation {
        city,
        timestamp,
        temperature: record.temperature,
        humidity: record.humidity,
        pressure: record.pressure,
        season,
    })
}

/// Accepts RFC 3339 (`2023-01-01T12:00:00+01:00`), a naive datetime
/// (`2023-01-01 12:00:00`, taken as UTC), or a bare date (`2023-01-01`,
/// taken as midnight UTC — the common shape of daily exports).
fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(DateTime::from_naive_utc_and_offset(ndt, Utc));
    }
    if let Ok(nd) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        let midnight = nd.and_hms_opt(0, 0, 0)?;
        return Some(DateTime::from_naive_utc_and_offset(midnight, Utc));
    }
    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
