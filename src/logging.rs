/// Structured logging for the temperature monitoring service.
///
/// Provides context-rich logging with data-source and city identifiers,
/// timestamps, and severity levels. Supports both console output and
/// file-based logging for scripted runs.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;

use crate::model::TempError;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

// ---------------------------------------------------------------------------
// Data Source Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// OpenWeatherMap live readings.
    Owm,
    /// Uploaded CSV dataset.
    Csv,
    /// Statistical analysis pipeline.
    Analysis,
    System,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Owm => write!(f, "OWM"),
            DataSource::Csv => write!(f, "CSV"),
            DataSource::Analysis => write!(f, "ANALYSIS"),
            DataSource::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureType {
    /// User-actionable failure - bad credential or unknown city; fix the
    /// input, not the service
    Actionable,
    /// Unexpected failure - indicates service degradation or an API change
    Unexpected,
    /// Unknown - cannot determine a cause from the error alone
    Unknown,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Actionable => write!(f, "ACTIONABLE"),
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
            FailureType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger Configuration
// ---------------------------------------------------------------------------

/// Global logger instance
static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

pub struct Logger {
    /// Minimum log level to display
    min_level: LogLevel,
    /// Optional file path for logging
    log_file: Option<String>,
}

impl Logger {
    /// Initialize the global logger
    pub fn init(min_level: LogLevel, log_file: Option<String>) {
        let logger = Logger {
            min_level,
            log_file,
        };

        *LOGGER.lock().unwrap() = Some(logger);
    }

    fn log(&self, level: LogLevel, source: &DataSource, city: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        let city_part = city.map(|c| format!(" [{}]", c)).unwrap_or_default();
        let log_entry = format!(
            "{} {} {}{}: {}",
            timestamp, level, source, city_part, message
        );

        match level {
            LogLevel::Error | LogLevel::Warning => eprintln!("{}", log_entry),
            LogLevel::Info | LogLevel::Debug => println!("{}", log_entry),
        }

        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &log_entry) {
                eprintln!("Failed to write to log file {}: {}", path, e);
            }
        }
    }

    fn append_to_file(path: &str, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Initialize the global logger
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>) {
    Logger::init(min_level, log_file.map(String::from));
}

/// Log a general informational message
pub fn info(source: DataSource, city: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Info, &source, city, message);
    }
}

/// Log a warning message
pub fn warn(source: DataSource, city: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Warning, &source, city, message);
    }
}

/// Log an error message
pub fn error(source: DataSource, city: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Error, &source, city, message);
    }
}

/// Log a debug message
pub fn debug(source: DataSource, city: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Debug, &source, city, message);
    }
}

// ---------------------------------------------------------------------------
// Failure Classification Helpers
// ---------------------------------------------------------------------------

/// Classify a weather API failure so the caller can render different
/// guidance: a bad credential needs a new key, a network failure may
/// deserve a bounded retry, a parse failure suggests an API change.
pub fn classify_owm_failure(err: &TempError) -> FailureType {
    match err {
        TempError::Credential | TempError::CityNotFound(_) | TempError::Input(_) => {
            FailureType::Actionable
        }
        TempError::Parse(_) => FailureType::Unexpected,
        TempError::Network(_) => FailureType::Unknown,
        _ => FailureType::Unknown,
    }
}

/// Log a weather API failure with automatic classification
pub fn log_owm_failure(city: &str, operation: &str, err: &TempError) {
    let failure_type = classify_owm_failure(err);
    let message = format!("{} failed [{}]: {}", operation, failure_type, err);

    match failure_type {
        FailureType::Actionable => warn(DataSource::Owm, Some(city), &message),
        FailureType::Unexpected => error(DataSource::Owm, Some(city), &message),
        FailureType::Unknown => warn(DataSource::Owm, Some(city), &message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warning);
        assert!(LogLevel::Warning < LogLevel::Error);
    }

    #[test]
    fn test_failure_classification() {
        assert_eq!(
            classify_owm_failure(&TempError::Credential),
            FailureType::Actionable
        );
        assert_eq!(
            classify_owm_failure(&TempError::Parse("bad body".to_string())),
            FailureType::Unexpected
        );
        assert_eq!(
            classify_owm_failure(&TempError::Network("timeout".to_string())),
            FailureType::Unknown
        );
    }
}
