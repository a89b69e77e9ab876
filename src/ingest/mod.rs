/// Data ingestion for the temperature monitoring service.
///
/// Submodules:
/// - `csv` — loads the uploaded historical dataset.
/// - `owm` — OpenWeatherMap client for live current-temperature readings.

pub mod csv;
pub mod owm;
