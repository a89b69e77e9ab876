/// OpenWeatherMap API client.
///
/// Retrieves the current temperature for a city from the OpenWeatherMap
/// current-weather endpoint, in metric units.
///
/// API documentation: https://openweathermap.org/current
///
/// Two execution strategies are exposed — a blocking call and an async call
/// suspending only at the network boundary. Both share the same URL builder
/// and the same pure status/body mapping, so for identical inputs they
/// produce identical results: execution strategy is a performance choice,
/// not a behavioral one.
///
/// Requests carry a 10-second timeout so a stalled API call cannot hang
/// the caller indefinitely.

use std::time::Duration;

use chrono::Utc;
use serde::Deserialize;

use crate::config::Config;
use crate::model::{LiveReading, TempError};

/// Request timeout applied to both client builders.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Registry city used by the credential probe.
const PROBE_CITY: &str = "London";

// ============================================================================
// OWM API Response Structures
// ============================================================================

/// Current weather response. Only the fields this service reads.
#[derive(Debug, Deserialize)]
pub struct OwmCurrentResponse {
    pub main: OwmMainBlock,
    /// Resolved city name as OWM spells it (e.g. query "cairo" → "Cairo").
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OwmMainBlock {
    /// Current air temperature, °C with units=metric.
    pub temp: f64,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
}

// ============================================================================
// URL construction and response mapping
// ============================================================================

/// Current-weather URL for one city. Spaces and other reserved characters
/// in the city name are percent-encoded by the URL parser at send time.
pub fn build_weather_url(base_url: &str, city: &str, credential: &str) -> String {
    format!(
        "{}/weather?q={}&appid={}&units=metric",
        base_url, city, credential
    )
}

/// Map an HTTP status and body to the live-reading result.
///
/// 200 → the parsed temperature; 401 → `Credential`; 404 → `CityNotFound`;
/// any other status → `Network`. Pure, so the error taxonomy is testable
/// without a live server.
pub fn parse_weather_response(city: &str, status: u16, body: &str) -> Result<f64, TempError> {
    match status {
        200 => {
            let parsed: OwmCurrentResponse = serde_json::from_str(body)
                .map_err(|e| TempError::Parse(format!("weather response: {}", e)))?;
            Ok(parsed.main.temp)
        }
        401 => Err(TempError::Credential),
        404 => Err(TempError::CityNotFound(city.to_string())),
        other => Err(TempError::Network(format!("HTTP {} from weather API", other))),
    }
}

fn credential<'a>(config: &'a Config) -> Result<&'a str, TempError> {
    config
        .api_key
        .as_deref()
        .ok_or_else(|| TempError::Input("no API credential configured (OWM_API_KEY)".to_string()))
}

// ============================================================================
// Client construction
// ============================================================================

/// Blocking HTTP client with the standard timeout.
pub fn blocking_client() -> Result<reqwest::blocking::Client, TempError> {
    reqwest::blocking::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| TempError::Network(format!("building HTTP client: {}", e)))
}

/// Async HTTP client with the standard timeout.
pub fn async_client() -> Result<reqwest::Client, TempError> {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| TempError::Network(format!("building HTTP client: {}", e)))
}

// ============================================================================
// Fetch operations
// ============================================================================

/// Fetch the current temperature for a city, blocking.
pub fn fetch_current_temperature(
    client: &reqwest::blocking::Client,
    config: &Config,
    city: &str,
) -> Result<LiveReading, TempError> {
    let url = build_weather_url(&config.base_url, city, credential(config)?);

    let response = client
        .get(&url)
        .send()
        .map_err(|e| TempError::Network(e.to_string()))?;

    let status = response.status().as_u16();
    let body = response
        .text()
        .map_err(|e| TempError::Network(e.to_string()))?;

    let temperature = parse_weather_response(city, status, &body)?;
    Ok(LiveReading {
        city: city.to_string(),
        temperature,
        retrieved_at: Utc::now(),
    })
}

/// Fetch the current temperature for a city without blocking the caller's
/// thread. Suspends only at the network boundary; a single request is in
/// flight per invocation. Same result as the blocking call for the same
/// inputs.
pub async fn fetch_current_temperature_async(
    client: &reqwest::Client,
    config: &Config,
    city: &str,
) -> Result<LiveReading, TempError> {
    let url = build_weather_url(&config.base_url, city, credential(config)?);

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| TempError::Network(e.to_string()))?;

    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .map_err(|e| TempError::Network(e.to_string()))?;

    let temperature = parse_weather_response(city, status, &body)?;
    Ok(LiveReading {
        city: city.to_string(),
        temperature,
        retrieved_at: Utc::now(),
    })
}

/// Cheap credential probe against a known city.
///
/// `Ok(true)` when the probe succeeds, `Ok(false)` on a 401. Network
/// failures propagate as errors since they say nothing about the
/// credential. Advisory only: a key can pass the probe and still hit rate
/// limits on later per-city queries.
pub fn validate_credential(
    client: &reqwest::blocking::Client,
    config: &Config,
) -> Result<bool, TempError> {
    match fetch_current_temperature(client, config, PROBE_CITY) {
        Ok(_) => Ok(true),
        Err(TempError::Credential) => Ok(false),
        Err(other) => Err(other),
    }
}

// ============================================================================
// Tests
// ============================================================================
