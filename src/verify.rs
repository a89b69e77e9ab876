//! Credential and registry verification.
//!
//! Probes the live weather API with the configured credential before the
//! dashboard starts issuing per-city queries: first a cheap single-city
//! probe, then optionally every city in the registry. The probe is
//! advisory, not authoritative — a key can pass here and still hit rate
//! limits later.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::cities::CITY_REGISTRY;
use crate::config::Config;
use crate::ingest::owm;
use crate::logging::{classify_owm_failure, FailureType};
use crate::model::TempError;

// ============================================================================
// Verification Results
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    pub timestamp: String,
    pub credential_accepted: bool,
    pub city_results: Vec<CityVerification>,
    pub summary: VerificationSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationSummary {
    pub total: usize,
    pub working: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityVerification {
    pub city: String,
    pub status: VerificationStatus,
    pub temperature: Option<f64>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum VerificationStatus {
    Success,
    Failed,
}

// ============================================================================
// Per-city verification
// ============================================================================

pub fn verify_city(
    client: &reqwest::blocking::Client,
    config: &Config,
    city: &str,
) -> CityVerification {
    match owm::fetch_current_temperature(client, config, city) {
        Ok(reading) => CityVerification {
            city: city.to_string(),
            status: VerificationStatus::Success,
            temperature: Some(reading.temperature),
            error_message: None,
        },
        Err(e) => CityVerification {
            city: city.to_string(),
            status: VerificationStatus::Failed,
            temperature: None,
            error_message: Some(e.to_string()),
        },
    }
}

// ============================================================================
// Full Verification Runner
// ============================================================================

/// Probe the credential, then every registry city.
///
/// Fails fast with `Credential` if the probe is rejected — there is no
/// point burning fifteen requests on a dead key.
pub fn run_full_verification(config: &Config) -> Result<VerificationReport, TempError> {
    let client = owm::blocking_client()?;

    if !owm::validate_credential(&client, config)? {
        return Err(TempError::Credential);
    }

    let mut report = VerificationReport {
        timestamp: Utc::now().to_rfc3339(),
        credential_accepted: true,
        city_results: Vec::new(),
        summary: VerificationSummary {
            total: CITY_REGISTRY.len(),
            working: 0,
            failed: 0,
        },
    };

    println!("Verifying registry cities...");
    for city in CITY_REGISTRY {
        print!("  {} ... ", city.name);
        let result = verify_city(&client, config, city.name);

        match result.status {
            VerificationStatus::Success => {
                println!("OK ({:.1} °C)", result.temperature.unwrap_or(f64::NAN));
                report.summary.working += 1;
            }
            VerificationStatus::Failed => {
                println!(
                    "FAILED: {}",
                    result.error_message.as_deref().unwrap_or("Unknown")
                );
                report.summary.failed += 1;
            }
        }

        report.city_results.push(result);
    }

    Ok(report)
}

pub fn print_summary(report: &VerificationReport) {
    println!("\n═══════════════════════════════════════════════════════════");
    println!("VERIFICATION SUMMARY");
    println!("═══════════════════════════════════════════════════════════");
    println!();
    println!(
        "Cities: {}/{} working  ({} failed)",
        report.summary.working, report.summary.total, report.summary.failed
    );

    for result in &report.city_results {
        if result.status == VerificationStatus::Failed {
            if let Some(msg) = &result.error_message {
                println!("  {}: {}", result.city, msg);
            }
        }
    }

    let success_rate = if report.summary.total > 0 {
        (report.summary.working as f64 / report.summary.total as f64) * 100.0
    } else {
        0.0
    };
    println!();
    println!("Overall Success Rate: {:.1}%", success_rate);
    println!("═══════════════════════════════════════════════════════════");
}

/// One-line guidance for a failed fetch, keyed by failure class.
pub fn guidance_for(err: &TempError) -> &'static str {
    match classify_owm_failure(err) {
        FailureType::Actionable => {
            "Check the API key (https://openweathermap.org/faq#error401) and the city spelling."
        }
        FailureType::Unexpected => "The weather API response changed shape; report this.",
        FailureType::Unknown => "Transient network problem; retrying once is reasonable.",
    }
}
