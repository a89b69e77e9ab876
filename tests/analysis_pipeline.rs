//! End-to-end analysis pipeline tests.
//!
//! These tests run the whole offline path — CSV text to session to
//! dispatcher to seasonal profiles to normalcy verdict — on the Berlin/Cairo
//! fixture the dashboard's acceptance scenarios are written against. No
//! network access.

use chrono::{TimeZone, Utc};

use tempmon_service::alert::normalcy::{check_normalcy, current_season_at};
use tempmon_service::analysis::anomaly::AnomalyPolicy;
use tempmon_service::analysis::dispatch::{
    analyze_city, partition_by_city, run_parallel, run_sequential,
};
use tempmon_service::analysis::seasonal::season_profile;
use tempmon_service::ingest::csv::load_dataset;
use tempmon_service::model::{CityPartition, Dataset, Normalcy, Season, TempError};
use tempmon_service::session::SessionState;

const FIXTURE: &str = "\
city,timestamp,temperature,humidity,pressure,season
Berlin,2023-01-01,10,60,1010,Winter
Berlin,2023-01-02,12,65,1012,Winter
Cairo,2023-01-01,25,70,1015,Summer
Cairo,2023-01-02,26,75,1016,Summer
";

fn fixture_dataset() -> Dataset {
    load_dataset(FIXTURE.as_bytes()).expect("fixture CSV must load")
}

// ---------------------------------------------------------------------------
// Session + loader
// ---------------------------------------------------------------------------

#[test]
fn test_session_round_trip() {
    let mut session = SessionState::new();
    assert!(session.dataset().is_err(), "fresh session has no dataset");

    session.load_dataset(fixture_dataset());
    let dataset = session.dataset().expect("dataset was just loaded");
    assert_eq!(dataset.len(), 4);
}

// ---------------------------------------------------------------------------
// Dispatcher modes
// ---------------------------------------------------------------------------

#[test]
fn test_both_modes_cover_every_city_exactly_once() {
    let dataset = fixture_dataset();
    let f = |p: &CityPartition| analyze_city(p, AnomalyPolicy::SeasonalSigma);

    let sequential = run_sequential(&dataset, f).expect("sequential run");
    let parallel = run_parallel(&dataset, f, Some(2)).expect("parallel run");

    for results in [&sequential, &parallel] {
        let mut cities: Vec<&str> = results.iter().map(|r| r.city.as_str()).collect();
        cities.sort();
        assert_eq!(cities, vec!["Berlin", "Cairo"], "one result per city");
    }
}

#[test]
fn test_modes_agree_numerically() {
    let dataset = fixture_dataset();
    let f = |p: &CityPartition| analyze_city(p, AnomalyPolicy::SeasonalSigma);

    let mut sequential = run_sequential(&dataset, f).expect("sequential run");
    let mut parallel = run_parallel(&dataset, f, Some(4)).expect("parallel run");
    sequential.sort_by(|a, b| a.city.cmp(&b.city));
    parallel.sort_by(|a, b| a.city.cmp(&b.city));

    assert_eq!(
        sequential, parallel,
        "identical input must yield numerically identical aggregates in both modes"
    );
}

// ---------------------------------------------------------------------------
// Seasonal profiles (acceptance scenario)
// ---------------------------------------------------------------------------

#[test]
fn test_berlin_and_cairo_acceptance_profiles() {
    let dataset = fixture_dataset();
    let partitions = partition_by_city(&dataset);

    let berlin = season_profile(&partitions[0], Season::Winter).expect("Berlin winter profile");
    assert_eq!(berlin.count, 2);
    assert!((berlin.mean - 11.0).abs() < 1e-9);
    assert!((berlin.q1 - 10.5).abs() < 1e-9);
    assert!((berlin.q3 - 11.5).abs() < 1e-9);

    let cairo = season_profile(&partitions[1], Season::Summer).expect("Cairo summer profile");
    assert_eq!(cairo.count, 2);
    assert!((cairo.mean - 25.5).abs() < 1e-9);
}

#[test]
fn test_profile_computation_is_idempotent() {
    let dataset = fixture_dataset();
    let partitions = partition_by_city(&dataset);

    let first = season_profile(&partitions[0], Season::Winter).unwrap();
    let second = season_profile(&partitions[0], Season::Winter).unwrap();
    assert_eq!(first, second);
}

// ---------------------------------------------------------------------------
// Live-reading normalcy against historical profiles
// ---------------------------------------------------------------------------

#[test]
fn test_normalcy_verdict_against_the_winter_profile() {
    let dataset = fixture_dataset();
    let partitions = partition_by_city(&dataset);

    // A January "now" resolves to winter, deterministic via clock injection.
    let january = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
    let season = current_season_at(january);
    assert_eq!(season, Season::Winter);

    let profile = season_profile(&partitions[0], season).unwrap();
    // Berlin winter IQR is 10.5..11.5.
    assert_eq!(check_normalcy(11.0, &profile), Normalcy::Normal);
    assert_eq!(check_normalcy(20.0, &profile), Normalcy::AboveRange);
    assert_eq!(check_normalcy(-5.0, &profile), Normalcy::BelowRange);
}

// ---------------------------------------------------------------------------
// Failure accounting
// ---------------------------------------------------------------------------

#[test]
fn test_a_city_with_no_summer_data_fails_the_summer_profile_loudly() {
    let dataset = fixture_dataset();
    let partitions = partition_by_city(&dataset);

    let result = season_profile(&partitions[0], Season::Summer);
    assert!(
        matches!(result, Err(TempError::Computation(_))),
        "Berlin has no summer rows; the aggregator must not invent a profile"
    );
}

#[test]
fn test_batch_failure_names_the_city_in_both_modes() {
    let dataset = fixture_dataset();
    let failing = |p: &CityPartition| -> Result<(), TempError> {
        if p.city == "Berlin" {
            Err(TempError::Computation("injected".to_string()))
        } else {
            Ok(())
        }
    };

    for result in [
        run_sequential(&dataset, failing),
        run_parallel(&dataset, failing, Some(2)),
    ] {
        match result {
            Err(TempError::CityFailed { city, .. }) => assert_eq!(city, "Berlin"),
            other => panic!("expected CityFailed {{ Berlin }}, got {:?}", other),
        }
    }
}
