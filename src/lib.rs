//! City temperature records analysis service.
//!
//! Loads an uploaded CSV of historical city temperatures into an in-memory
//! session, computes descriptive statistics, anomaly flags, and seasonal
//! profiles per city (sequentially or on a worker pool), and optionally
//! compares a live reading from the OpenWeatherMap API against the
//! historical interquartile range for the current season.
//!
//! State lives only in the session for the duration of one run. There is no
//! persistence layer and no cross-invocation cache.

pub mod alert;
pub mod analysis;
pub mod cities;
pub mod config;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod session;
pub mod verify;
