//! Generate a synthetic multi-city temperature CSV.
//!
//! When no real export is at hand, this produces a dataset in the exact
//! shape the loader expects: a seasonal sinusoid per city plus Gaussian
//! day-to-day noise, one observation per day.
//!
//! Usage:
//!   generate_sample <out.csv> [days]
//!
//! Defaults to 730 days (two full seasonal cycles) per city.

use std::error::Error;

use chrono::{Duration, NaiveDate};
use rand::thread_rng;
use rand_distr::{Distribution, Normal};

use tempmon_service::alert::normalcy::season_for_month;
use chrono::Datelike;

/// Annual temperature model for one synthetic city.
struct CityModel {
    name: &'static str,
    /// Annual mean, °C.
    base: f64,
    /// Seasonal swing around the mean, °C.
    amplitude: f64,
    /// Day-to-day noise, °C.
    noise_std: f64,
}

const CITY_MODELS: &[CityModel] = &[
    CityModel { name: "Berlin", base: 10.0, amplitude: 10.0, noise_std: 3.0 },
    CityModel { name: "Cairo", base: 22.0, amplitude: 7.0, noise_std: 2.0 },
    CityModel { name: "Moscow", base: 6.0, amplitude: 14.0, noise_std: 4.0 },
    CityModel { name: "Singapore", base: 27.0, amplitude: 1.0, noise_std: 1.0 },
];

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let out_path = args.next().ok_or("usage: generate_sample <out.csv> [days]")?;
    let days: i64 = match args.next() {
        Some(d) => d.parse()?,
        None => 730,
    };

    let start = NaiveDate::from_ymd_opt(2022, 1, 1).ok_or("bad start date")?;
    let mut rng = thread_rng();
    let mut writer = csv::Writer::from_path(&out_path)?;

    writer.write_record(["city", "timestamp", "temperature", "humidity", "pressure", "season"])?;

    for model in CITY_MODELS {
        let noise = Normal::new(0.0, model.noise_std)?;
        let humidity_noise = Normal::new(65.0_f64, 10.0)?;
        let pressure_noise = Normal::new(1013.0, 6.0)?;

        for day in 0..days {
            let date = start + Duration::days(day);
            // Coldest around late January in this model.
            let phase =
                2.0 * std::f64::consts::PI * (date.ordinal() as f64 - 28.0) / 365.25;
            let temperature = model.base - model.amplitude * phase.cos() + noise.sample(&mut rng);
            let season = season_for_month(date.month());

            writer.write_record([
                model.name.to_string(),
                date.format("%Y-%m-%d").to_string(),
                format!("{:.1}", temperature),
                format!("{:.0}", humidity_noise.sample(&mut rng).clamp(5.0, 100.0)),
                format!("{:.0}", pressure_noise.sample(&mut rng)),
                season.as_str().to_string(),
            ])?;
        }
    }

    writer.flush()?;
    println!(
        "Wrote {} observations for {} cities to {}",
        days as usize * CITY_MODELS.len(),
        CITY_MODELS.len(),
        out_path
    );
    Ok(())
}
