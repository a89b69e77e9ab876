/// Per-season aggregation for one city's observations.
///
/// Groups a partition by its season label and computes mean, median, first
/// and third quartile (linear interpolation), and count per group. Pure
/// functions of the partition: calling twice yields identical results.

use crate::analysis::series::{mean, median, quantile};
use crate::model::{CityPartition, Season, SeasonalProfile, TempError, SEASONS};

/// Aggregate one season group of a partition.
///
/// Fails with `Computation` when the partition has no observations for the
/// requested season — an empty group has no meaningful quartiles.
pub fn season_profile(
    partition: &CityPartition,
    season: Season,
) -> Result<SeasonalProfile, TempError> {
    let temps: Vec<f64> = partition
        .observations
        .iter()
        .filter(|o| o.season == season)
        .map(|o| o.temperature)
        .collect();

    if temps.is_empty() {
        return Err(TempError::Computation(format!(
            "no {} observations for city {}",
            season, partition.city
        )));
    }

    // Non-empty group, so every aggregate below exists.
    Ok(SeasonalProfile {
        city: partition.city.clone(),
        season,
        mean: mean(&temps).expect("non-empty group"),
        median: median(&temps).expect("non-empty group"),
        q1: quantile(&temps, 0.25).expect("non-empty group"),
        q3: quantile(&temps, 0.75).expect("non-empty group"),
        count: temps.len(),
    })
}

/// Profiles for every season present in the partition, in fixed season
/// order (winter, spring, summer, autumn). Seasons with no observations are
/// simply absent rather than reported as empty groups.
pub fn seasonal_profiles(partition: &CityPartition) -> Vec<SeasonalProfile> {
    SEASONS
        .iter()
        .filter_map(|&season| season_profile(partition, season).ok())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
