/// Core data types for the city temperature monitoring service.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no logic, no I/O, and no external dependencies beyond chrono —
/// only types.

use chrono::{DateTime, Utc};

// ---------------------------------------------------------------------------
// Seasons
// ---------------------------------------------------------------------------

/// The four season labels carried by every observation.
///
/// Labels come from the uploaded CSV, which uses the Northern-hemisphere
/// convention throughout. See `alert::normalcy::season_for_date` for the
/// date-to-season mapping applied to live readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

/// Fixed iteration order used wherever per-season output must be stable.
pub const SEASONS: [Season; 4] = [Season::Winter, Season::Spring, Season::Summer, Season::Autumn];

impl Season {
    /// Parse a CSV season label, case-insensitively. "fall" is accepted
    /// as a synonym for autumn.
    pub fn parse(label: &str) -> Option<Season> {
        match label.trim().to_ascii_lowercase().as_str() {
            "winter" => Some(Season::Winter),
            "spring" => Some(Season::Spring),
            "summer" => Some(Season::Summer),
            "autumn" | "fall" => Some(Season::Autumn),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Winter => "winter",
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Observation types
// ---------------------------------------------------------------------------

/// A single historical temperature record for one city.
///
/// Corresponds to one row of the uploaded CSV. Immutable once loaded:
/// the loader rejects rows with an empty city or unparseable timestamp,
/// so every constructed observation satisfies the dataset invariant.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub city: String,
    pub timestamp: DateTime<Utc>,
    /// Air temperature in °C.
    pub temperature: f64,
    /// Relative humidity in percent, when the CSV provides it.
    pub humidity: Option<f64>,
    /// Atmospheric pressure in hPa, when the CSV provides it.
    pub pressure: Option<f64>,
    pub season: Season,
}

/// An ordered collection of observations, loaded wholesale from one CSV.
///
/// Order is upload order, not guaranteed chronological. The dataset is owned
/// by the session for its lifetime; every derived structure (partitions,
/// profiles, flags) is computed fresh from it and owned by the caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub observations: Vec<Observation>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// The subsequence of a dataset for one city, in dataset order.
///
/// Derived, read-only view. Recomputed on demand by
/// `analysis::dispatch::partition_by_city`; the core never caches it across
/// the dataset's lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct CityPartition {
    pub city: String,
    pub observations: Vec<Observation>,
}

impl CityPartition {
    /// The temperature column of this partition, in dataset order.
    pub fn temperatures(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.temperature).collect()
    }
}

// ---------------------------------------------------------------------------
// Derived aggregates
// ---------------------------------------------------------------------------

/// Aggregate statistics for one city's observations in one season.
///
/// Quartiles use the linear interpolation convention so downstream
/// comparisons reproduce standard statistical packages bit-for-bit within
/// floating-point tolerance.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalProfile {
    pub city: String,
    pub season: Season,
    pub mean: f64,
    pub median: f64,
    pub q1: f64,
    pub q3: f64,
    pub count: usize,
}

/// Descriptive statistics for one numeric series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSummary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation (n - 1). Zero when the series has one value.
    pub std_dev: f64,
}

/// Per-city output of one dispatcher run.
///
/// Carries the city name so results stay attributable to their source
/// partition when the worker pool returns them out of submission order.
#[derive(Debug, Clone, PartialEq)]
pub struct CityAnalysis {
    pub city: String,
    pub summary: SeriesSummary,
    pub profiles: Vec<SeasonalProfile>,
    pub anomaly_count: usize,
}

// ---------------------------------------------------------------------------
// Live readings
// ---------------------------------------------------------------------------

/// A current temperature obtained from the remote weather API.
///
/// Ephemeral: never stored in the dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveReading {
    pub city: String,
    /// Current air temperature in °C.
    pub temperature: f64,
    pub retrieved_at: DateTime<Utc>,
}

/// Verdict of comparing a live reading against a seasonal profile's
/// interquartile range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalcy {
    /// q1 <= reading <= q3.
    Normal,
    /// reading > q3.
    AboveRange,
    /// reading < q1.
    BelowRange,
}

impl std::fmt::Display for Normalcy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Normalcy::Normal => write!(f, "NORMAL"),
            Normalcy::AboveRange => write!(f, "ABOVE RANGE"),
            Normalcy::BelowRange => write!(f, "BELOW RANGE"),
        }
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when loading, analyzing, or fetching temperature data.
#[derive(Debug, Clone, PartialEq)]
pub enum TempError {
    /// Malformed input: missing required column, unparseable row, or no
    /// dataset loaded. Surfaced to the caller, not recovered.
    Input(String),
    /// HTTP 401 from the weather API. User-actionable; never retried
    /// automatically.
    Credential,
    /// The weather API does not know the requested city (HTTP 404).
    CityNotFound(String),
    /// Timeout, connection failure, or other non-200 response. Eligible for
    /// a bounded retry by the caller, not by this crate.
    Network(String),
    /// The response body could not be deserialized.
    Parse(String),
    /// Statistics requested on an empty or degenerate partition. Fails
    /// loudly rather than returning a misleading zero.
    Computation(String),
    /// A dispatcher batch failed; names the city whose analysis failed so
    /// "all cities covered" accounting stays sound.
    CityFailed { city: String, message: String },
}

impl std::fmt::Display for TempError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TempError::Input(msg) => write!(f, "Input error: {}", msg),
            TempError::Credential => write!(f, "Invalid API credential (HTTP 401)"),
            TempError::CityNotFound(city) => write!(f, "City not found: {}", city),
            TempError::Network(msg) => write!(f, "Network error: {}", msg),
            TempError::Parse(msg) => write!(f, "Parse error: {}", msg),
            TempError::Computation(msg) => write!(f, "Computation error: {}", msg),
            TempError::CityFailed { city, message } => {
                write!(f, "Analysis failed for city {}: {}", city, message)
            }
        }
    }
}

impl std::error::Error for TempError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_parse_is_case_insensitive() {
        assert_eq!(Season::parse("Winter"), Some(Season::Winter));
        assert_eq!(Season::parse("SUMMER"), Some(Season::Summer));
        assert_eq!(Season::parse("  spring "), Some(Season::Spring));
        assert_eq!(Season::parse("fall"), Some(Season::Autumn));
        assert_eq!(Season::parse("monsoon"), None);
    }

    #[test]
    fn test_error_display_names_the_failing_city() {
        let err = TempError::CityFailed {
            city: "Berlin".to_string(),
            message: "empty partition".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Analysis failed for city Berlin: empty partition"
        );
    }
}
