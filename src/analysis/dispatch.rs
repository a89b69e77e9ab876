/// Per-city analysis dispatch.
///
/// Partitions the dataset by city and applies a per-partition analysis
/// function in one of two interchangeable execution modes:
///
/// - sequential: cities in the dataset's first-seen order;
/// - parallel: partitions distributed across a fixed-size rayon pool whose
///   lifetime is scoped to the invocation.
///
/// Partitions are independent and share no mutable state, so the pool needs
/// no locking. The contract of the parallel mode guarantees only that the
/// set of per-city results is complete; each result carries its city name
/// for attribution. If the analysis fails for any partition the whole batch
/// fails, naming the offending city — silently dropping a city's results
/// would break "all cities covered" accounting.

use rayon::prelude::*;

use crate::analysis::anomaly::{
    percentile_flags, rolling_sigma_flags, seasonal_sigma_flags, AnomalyPolicy,
    PERCENTILE_THRESHOLD, SIGMA_FACTOR,
};
use crate::analysis::seasonal::seasonal_profiles;
use crate::analysis::series::{summarize, DEFAULT_WINDOW};
use crate::model::{CityAnalysis, CityPartition, Dataset, TempError};

// ---------------------------------------------------------------------------
// Partitioning
// ---------------------------------------------------------------------------

/// Split the dataset into one partition per distinct city, in first-seen
/// order. Observations keep their dataset order within each partition.
pub fn partition_by_city(dataset: &Dataset) -> Vec<CityPartition> {
    let mut order: Vec<String> = Vec::new();
    for obs in &dataset.observations {
        if !order.iter().any(|c| c == &obs.city) {
            order.push(obs.city.clone());
        }
    }

    order
        .into_iter()
        .map(|city| {
            let observations = dataset
                .observations
                .iter()
                .filter(|o| o.city == city)
                .cloned()
                .collect();
            CityPartition { city, observations }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Execution modes
// ---------------------------------------------------------------------------

/// Apply `f` to every city partition sequentially, in first-seen order.
pub fn run_sequential<T, F>(dataset: &Dataset, f: F) -> Result<Vec<T>, TempError>
where
    F: Fn(&CityPartition) -> Result<T, TempError>,
{
    let mut results = Vec::new();
    for partition in partition_by_city(dataset) {
        let result = f(&partition).map_err(|e| attribute(&partition.city, e))?;
        results.push(result);
    }
    Ok(results)
}

/// Apply `f` to every city partition on a fixed-size worker pool.
///
/// `workers` of `None` uses the machine's available parallelism. The pool is
/// built for this call and dropped before it returns — it is never held
/// across invocations.
pub fn run_parallel<T, F>(
    dataset: &Dataset,
    f: F,
    workers: Option<usize>,
) -> Result<Vec<T>, TempError>
where
    T: Send,
    F: Fn(&CityPartition) -> Result<T, TempError> + Sync,
{
    let workers = workers.unwrap_or_else(|| {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    });

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| TempError::Computation(format!("worker pool: {}", e)))?;

    let partitions = partition_by_city(dataset);
    pool.install(|| {
        partitions
            .par_iter()
            .map(|p| f(p).map_err(|e| attribute(&p.city, e)))
            .collect()
    })
}

/// Wrap a partition failure so the batch error names its city.
fn attribute(city: &str, err: TempError) -> TempError {
    match err {
        already @ TempError::CityFailed { .. } => already,
        other => TempError::CityFailed {
            city: city.to_string(),
            message: other.to_string(),
        },
    }
}

// ---------------------------------------------------------------------------
// Standard per-city pipeline
// ---------------------------------------------------------------------------

/// The standard analysis applied per city: descriptive summary, seasonal
/// profiles, and an anomaly count under the selected policy.
///
/// Pure function of the partition; safe to run on the worker pool.
pub fn analyze_city(
    partition: &CityPartition,
    policy: AnomalyPolicy,
) -> Result<CityAnalysis, TempError> {
    let temps = partition.temperatures();
    let summary = summarize(&temps)?;

    let anomaly_count = match policy {
        AnomalyPolicy::RollingSigma => {
            rolling_sigma_flags(&temps, DEFAULT_WINDOW, 2, SIGMA_FACTOR)
                .iter()
                .flatten()
                .filter(|f| **f)
                .count()
        }
        AnomalyPolicy::Percentile => percentile_flags(&temps, PERCENTILE_THRESHOLD)?
            .iter()
            .filter(|f| **f)
            .count(),
        AnomalyPolicy::SeasonalSigma => seasonal_sigma_flags(partition, SIGMA_FACTOR)
            .iter()
            .filter(|f| **f)
            .count(),
    };

    Ok(CityAnalysis {
        city: partition.city.clone(),
        summary,
        profiles: seasonal_profiles(partition),
        anomaly_count,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Observation, Season};
    use chrono::{TimeZone, Utc};

    fn observation(city: &str, day: u32, temperature: f64, season: Season) -> Observation {
        Observation {
            city: city.to_string(),
            timestamp: Utc.with_ymd_and_hms(2023, 1, day, 0, 0, 0).unwrap(),
            temperature,
            humidity: None,
            pressure: None,
            season,
        }
    }

    fn berlin_cairo_dataset() -> Dataset {
        Dataset {
            observations: vec![
                observation("Berlin", 1, 10.0, Season::Winter),
                observation("Cairo", 1, 25.0, Season::Summer),
                observation("Berlin", 2, 12.0, Season::Winter),
                observation("Cairo", 2, 26.0, Season::Summer),
            ],
        }
    }

    #[test]
    fn test_partitioning_preserves_first_seen_order() {
        let partitions = partition_by_city(&berlin_cairo_dataset());
        let cities: Vec<&str> = partitions.iter().map(|p| p.city.as_str()).collect();
        assert_eq!(cities, vec!["Berlin", "Cairo"]);
        assert_eq!(partitions[0].observations.len(), 2);
        assert_eq!(partitions[1].observations.len(), 2);
    }

    #[test]
    fn test_sequential_and_parallel_modes_agree() {
        let dataset = berlin_cairo_dataset();
        let f = |p: &CityPartition| analyze_city(p, AnomalyPolicy::SeasonalSigma);

        let sequential = run_sequential(&dataset, f).unwrap();
        let mut parallel = run_parallel(&dataset, f, Some(2)).unwrap();

        // The parallel contract only guarantees set-completeness; compare by
        // city name.
        parallel.sort_by(|a, b| a.city.cmp(&b.city));
        let mut sequential_sorted = sequential.clone();
        sequential_sorted.sort_by(|a, b| a.city.cmp(&b.city));

        assert_eq!(sequential_sorted.len(), 2, "exactly one result per city");
        assert_eq!(
            sequential_sorted, parallel,
            "both modes must compute numerically identical aggregates"
        );
    }

    #[test]
    fn test_failing_partition_fails_the_batch_and_names_the_city() {
        let dataset = berlin_cairo_dataset();
        let f = |p: &CityPartition| -> Result<(), TempError> {
            if p.city == "Cairo" {
                Err(TempError::Computation("synthetic failure".to_string()))
            } else {
                Ok(())
            }
        };

        for result in [
            run_sequential(&dataset, f),
            run_parallel(&dataset, f, Some(2)),
        ] {
            match result {
                Err(TempError::CityFailed { city, .. }) => assert_eq!(city, "Cairo"),
                other => panic!("expected CityFailed for Cairo, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_analyze_city_carries_the_city_name() {
        let partitions = partition_by_city(&berlin_cairo_dataset());
        let analysis = analyze_city(&partitions[0], AnomalyPolicy::Percentile).unwrap();
        assert_eq!(analysis.city, "Berlin");
        assert_eq!(analysis.summary.count, 2);
        assert_eq!(analysis.profiles.len(), 1, "Berlin has winter data only");
    }

    #[test]
    fn test_empty_dataset_dispatches_to_nothing() {
        let dataset = Dataset::default();
        let results =
            run_sequential(&dataset, |p| analyze_city(p, AnomalyPolicy::Percentile)).unwrap();
        assert!(results.is_empty());
    }
}
