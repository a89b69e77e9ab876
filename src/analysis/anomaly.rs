/// Anomaly detection over one city's temperature series.
///
/// Three policies, selected by the caller and never layered:
///
/// - rolling sigma: distance from a trailing-window mean in units of the
///   trailing-window standard deviation;
/// - percentile: a single global threshold at a fixed quantile of the
///   partition (high outliers only);
/// - season-relative sigma: distance from the season group's mean/std,
///   computed once over the whole partition.
///
/// The percentile policy is one-sided: it catches hot outliers only. The
/// asymmetry is intentional and covered by tests.

use crate::analysis::series::{quantile, rolling_mean, rolling_std, sample_std};
use crate::model::{CityPartition, Season, TempError};

/// Multiplier applied to the standard deviation by both sigma policies.
pub const SIGMA_FACTOR: f64 = 2.0;

/// Quantile used by the percentile policy.
pub const PERCENTILE_THRESHOLD: f64 = 0.9;

/// Caller-selectable anomaly policy. See the module docs for the rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnomalyPolicy {
    RollingSigma,
    Percentile,
    SeasonalSigma,
}

// ---------------------------------------------------------------------------
// Rolling sigma policy
// ---------------------------------------------------------------------------

/// Flags observation i when |t_i - rolling_mean_i| > factor * rolling_std_i
/// over a trailing `window`.
///
/// Positions where the rolling statistics are undefined (fewer than
/// `min_periods` values, or fewer than two for the deviation) have undefined
/// anomaly status and yield `None`. Pass `min_periods = 1` to relax the
/// head of the series as far as the deviation allows.
pub fn rolling_sigma_flags(
    values: &[f64],
    window: usize,
    min_periods: usize,
    factor: f64,
) -> Vec<Option<bool>> {
    let means = rolling_mean(values, window, min_periods);
    let stds = rolling_std(values, window, min_periods);

    values
        .iter()
        .zip(means.iter().zip(stds.iter()))
        .map(|(v, (m, s))| match (m, s) {
            (Some(m), Some(s)) => Some((v - m).abs() > factor * s),
            _ => None,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Percentile policy
// ---------------------------------------------------------------------------

/// Flags observations strictly above the partition-global quantile
/// threshold. Low outliers are never flagged; the threshold is one-sided.
///
/// Fails with `Computation` on an empty series: a threshold over nothing is
/// not a meaningful answer.
pub fn percentile_flags(values: &[f64], q: f64) -> Result<Vec<bool>, TempError> {
    let threshold = quantile(values, q).ok_or_else(|| {
        TempError::Computation(format!(
            "percentile threshold undefined for {} values at q={}",
            values.len(),
            q
        ))
    })?;
    Ok(values.iter().map(|v| *v > threshold).collect())
}

// ---------------------------------------------------------------------------
// Season-relative sigma policy
// ---------------------------------------------------------------------------

/// Flags observation i when |t_i - season_mean| > factor * season_std, where
/// mean and std are computed once per season group over the whole partition
/// (not rolling).
///
/// Observations whose season group is too small for a sample deviation, or
/// whose group deviation is zero, are never flagged: with std = 0 the band
/// mean ± factor·0 admits only the mean itself, and every member of a
/// constant group sits on it.
pub fn seasonal_sigma_flags(partition: &CityPartition, factor: f64) -> Vec<bool> {
    let group_stats = |season: Season| -> Option<(f64, f64)> {
        let group: Vec<f64> = partition
            .observations
            .iter()
            .filter(|o| o.season == season)
            .map(|o| o.temperature)
            .collect();
        let std = sample_std(&group)?;
        let mean = group.iter().sum::<f64>() / group.len() as f64;
        Some((mean, std))
    };

    let stats: Vec<(Season, Option<(f64, f64)>)> = crate::model::SEASONS
        .iter()
        .map(|&s| (s, group_stats(s)))
        .collect();

    partition
        .observations
        .iter()
        .map(|obs| {
            let entry = stats
                .iter()
                .find(|(s, _)| *s == obs.season)
                .and_then(|(_, st)| *st);
            match entry {
                Some((mean, std)) => (obs.temperature - mean).abs() > factor * std,
                None => false,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Observation;
    use chrono::{TimeZone, Utc};

    fn observation(city: &str, temperature: f64, season: Season) -> Observation {
        Observation {
            city: city.to_string(),
            timestamp: Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
            temperature,
            humidity: None,
            pressure: None,
            season,
        }
    }

    fn partition(city: &str, temps: &[(f64, Season)]) -> CityPartition {
        CityPartition {
            city: city.to_string(),
            observations: temps
                .iter()
                .map(|(t, s)| observation(city, *t, *s))
                .collect(),
        }
    }

    // --- Rolling sigma ------------------------------------------------------

    #[test]
    fn test_constant_series_flags_nothing() {
        // std = 0 => no observation lies outside mean ± 0.
        let series = vec![12.0; 50];
        let flags = rolling_sigma_flags(&series, 30, 2, SIGMA_FACTOR);
        assert!(
            flags.iter().flatten().all(|f| !f),
            "a constant series must produce no anomalies"
        );
    }

    #[test]
    fn test_rolling_sigma_head_is_undefined_without_relaxation() {
        let series: Vec<f64> = (0..40).map(|i| i as f64).collect();
        let flags = rolling_sigma_flags(&series, 30, 30, SIGMA_FACTOR);
        assert!(
            flags[..29].iter().all(|f| f.is_none()),
            "positions with insufficient window history have undefined status"
        );
        assert!(flags[29..].iter().all(|f| f.is_some()));
    }

    #[test]
    fn test_rolling_sigma_catches_a_spike() {
        // Stable series with one hot day inside the window.
        let mut series = vec![10.0, 10.1, 9.9, 10.0, 10.2, 9.8, 10.1, 10.0, 9.9, 10.1];
        series.push(25.0);
        let flags = rolling_sigma_flags(&series, 30, 2, SIGMA_FACTOR);
        assert_eq!(
            flags.last().copied().flatten(),
            Some(true),
            "a 15-degree spike over a stable window must be flagged"
        );
        assert_eq!(flags[5].unwrap_or(true), false, "ordinary day is not flagged");
    }

    // --- Percentile ---------------------------------------------------------

    #[test]
    fn test_percentile_flags_roughly_ten_percent_of_uniform_sample() {
        // 1000 evenly spread values. The 90th-percentile threshold sits at
        // 900.1 (linear interpolation), leaving the 100 strictly-greater
        // values flagged. Tolerance covers the interpolation boundary.
        let series: Vec<f64> = (1..=1000).map(|i| i as f64).collect();
        let flags = percentile_flags(&series, PERCENTILE_THRESHOLD).unwrap();
        let flagged = flags.iter().filter(|f| **f).count();
        assert!(
            (90..=110).contains(&flagged),
            "expected ~10% of 1000 flagged, got {}",
            flagged
        );
    }

    #[test]
    fn test_percentile_never_flags_low_outliers() {
        // One-sided threshold: only hot outliers are caught.
        let mut series = vec![20.0; 99];
        series.push(-40.0);
        let flags = percentile_flags(&series, PERCENTILE_THRESHOLD).unwrap();
        assert!(
            !flags[99],
            "a severe low outlier is not flagged by the percentile policy"
        );
    }

    #[test]
    fn test_percentile_on_empty_series_is_an_error() {
        let result = percentile_flags(&[], PERCENTILE_THRESHOLD);
        assert!(matches!(result, Err(TempError::Computation(_))));
    }

    // --- Season-relative sigma ----------------------------------------------

    #[test]
    fn test_seasonal_sigma_flags_only_the_outlier_season_member() {
        let p = partition(
            "Berlin",
            &[
                (0.0, Season::Winter),
                (1.0, Season::Winter),
                (-1.0, Season::Winter),
                (0.5, Season::Winter),
                (-0.5, Season::Winter),
                (15.0, Season::Winter), // far outside the winter band
                (20.0, Season::Summer),
                (21.0, Season::Summer),
            ],
        );
        let flags = seasonal_sigma_flags(&p, SIGMA_FACTOR);
        assert!(flags[5], "the 15-degree winter day must be flagged");
        assert!(
            flags[..5].iter().all(|f| !f),
            "ordinary winter days are not flagged"
        );
        assert!(
            !flags[6] && !flags[7],
            "summer group is judged against its own mean/std"
        );
    }

    #[test]
    fn test_seasonal_sigma_constant_group_flags_nothing() {
        let p = partition(
            "Cairo",
            &[
                (30.0, Season::Summer),
                (30.0, Season::Summer),
                (30.0, Season::Summer),
            ],
        );
        let flags = seasonal_sigma_flags(&p, SIGMA_FACTOR);
        assert!(flags.iter().all(|f| !f));
    }

    #[test]
    fn test_seasonal_sigma_singleton_group_flags_nothing() {
        // One observation in a season: no sample deviation, never flagged.
        let p = partition("Tokyo", &[(12.0, Season::Spring)]);
        let flags = seasonal_sigma_flags(&p, SIGMA_FACTOR);
        assert_eq!(flags, vec![false]);
    }
}
