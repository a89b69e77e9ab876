//! Command-line runner for the temperature analysis service.
//!
//! Usage:
//!   tempmon_service <data.csv> [--parallel] [--policy rolling|percentile|seasonal]
//!                   [--live <city>] [--verify]
//!
//! Loads the CSV into a session, runs the per-city analysis pipeline, and
//! prints a summary per city. With `--live`, fetches the current temperature
//! for one city and reports the normalcy verdict against that city's profile
//! for the current season. With `--verify`, probes the credential and every
//! registry city instead of analyzing.

use std::path::Path;
use std::process;

use tempmon_service::alert::normalcy::{check_normalcy, current_season};
use tempmon_service::analysis::anomaly::AnomalyPolicy;
use tempmon_service::analysis::dispatch::{analyze_city, partition_by_city, run_parallel, run_sequential};
use tempmon_service::analysis::seasonal::season_profile;
use tempmon_service::cities::find_city;
use tempmon_service::config::Config;
use tempmon_service::ingest::{csv, owm};
use tempmon_service::logging::{self, DataSource, LogLevel};
use tempmon_service::model::{CityAnalysis, TempError};
use tempmon_service::session::SessionState;
use tempmon_service::verify;

struct Args {
    csv_path: Option<String>,
    parallel: bool,
    policy: AnomalyPolicy,
    live_city: Option<String>,
    verify: bool,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        csv_path: None,
        parallel: false,
        policy: AnomalyPolicy::SeasonalSigma,
        live_city: None,
        verify: false,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--parallel" => args.parallel = true,
            "--verify" => args.verify = true,
            "--policy" => {
                let value = iter.next().ok_or("--policy needs a value")?;
                args.policy = match value.as_str() {
                    "rolling" => AnomalyPolicy::RollingSigma,
                    "percentile" => AnomalyPolicy::Percentile,
                    "seasonal" => AnomalyPolicy::SeasonalSigma,
                    other => return Err(format!("unknown policy: {}", other)),
                };
            }
            "--live" => {
                args.live_city = Some(iter.next().ok_or("--live needs a city")?);
            }
            other if args.csv_path.is_none() && !other.starts_with("--") => {
                args.csv_path = Some(other.to_string());
            }
            other => return Err(format!("unexpected argument: {}", other)),
        }
    }
    Ok(args)
}

fn print_analysis(analysis: &CityAnalysis) {
    println!("\n{}", analysis.city);
    println!(
        "  {} observations, {:.1}..{:.1} °C, mean {:.2}, median {:.2}, std {:.2}",
        analysis.summary.count,
        analysis.summary.min,
        analysis.summary.max,
        analysis.summary.mean,
        analysis.summary.median,
        analysis.summary.std_dev,
    );
    println!("  anomalies: {}", analysis.anomaly_count);
    for profile in &analysis.profiles {
        println!(
            "  {:<6}  mean {:>6.2}  median {:>6.2}  q1 {:>6.2}  q3 {:>6.2}  n={}",
            profile.season.as_str(),
            profile.mean,
            profile.median,
            profile.q1,
            profile.q3,
            profile.count
        );
    }
}

fn live_check(config: &Config, session: &SessionState, city: &str) -> Result<(), TempError> {
    let client = owm::blocking_client()?;
    let reading = match owm::fetch_current_temperature(&client, config, city) {
        Ok(reading) => reading,
        Err(e) => {
            logging::log_owm_failure(city, "live fetch", &e);
            eprintln!("  {}", verify::guidance_for(&e));
            return Err(e);
        }
    };

    println!(
        "\nCurrent temperature in {}: {:.1} °C",
        reading.city, reading.temperature
    );

    if let Some(registry_entry) = find_city(city) {
        if registry_entry.southern_hemisphere {
            println!(
                "  note: season mapping uses the Northern-hemisphere convention; \
                 it is inverted for {}",
                city
            );
        }
    }

    // Normalcy needs history for this city in the season in effect now.
    let season = current_season();
    let dataset = session.dataset()?;
    let partition = partition_by_city(dataset)
        .into_iter()
        .find(|p| p.city.eq_ignore_ascii_case(city))
        .ok_or_else(|| {
            TempError::Computation(format!("no historical observations for {}", city))
        })?;
    let profile = season_profile(&partition, season)?;
    let verdict = check_normalcy(reading.temperature, &profile);

    println!(
        "  {} range for {}: q1 {:.1} .. q3 {:.1} ({} observations)",
        season, profile.city, profile.q1, profile.q3, profile.count
    );
    println!("  verdict: {}", verdict);
    Ok(())
}

fn run(args: Args) -> Result<(), TempError> {
    let config = Config::load()?;

    if args.verify {
        let report = verify::run_full_verification(&config)?;
        verify::print_summary(&report);
        return Ok(());
    }

    let csv_path = args
        .csv_path
        .ok_or_else(|| TempError::Input("no CSV file given".to_string()))?;

    let mut session = SessionState::new();
    let dataset = csv::load_dataset_from_path(Path::new(&csv_path))?;
    logging::info(
        DataSource::Csv,
        None,
        &format!("loaded {} observations from {}", dataset.len(), csv_path),
    );
    session.load_dataset(dataset);

    let dataset = session.dataset()?;
    let policy = args.policy;
    let analyze = move |p: &tempmon_service::model::CityPartition| analyze_city(p, policy);
    let results = if args.parallel {
        run_parallel(dataset, analyze, config.workers)?
    } else {
        run_sequential(dataset, analyze)?
    };

    println!(
        "Analyzed {} cities ({})",
        results.len(),
        if args.parallel { "parallel" } else { "sequential" }
    );
    for analysis in &results {
        print_analysis(analysis);
    }

    if let Some(city) = &args.live_city {
        live_check(&config, &session, city)?;
    }

    Ok(())
}

fn main() {
    logging::init_logger(LogLevel::Info, None);

    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            eprintln!(
                "Usage: tempmon_service <data.csv> [--parallel] \
                 [--policy rolling|percentile|seasonal] [--live <city>] [--verify]"
            );
            process::exit(2);
        }
    };

    if let Err(e) = run(args) {
        logging::error(DataSource::System, None, &e.to_string());
        process::exit(1);
    }
}
