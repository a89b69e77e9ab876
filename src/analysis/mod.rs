/// Statistical analysis for the temperature monitoring service.
///
/// Everything in this tree is a pure function of its inputs: no caching, no
/// shared mutable state. Every user-triggered action recomputes from the
/// dataset snapshot it was handed.
///
/// Submodules:
/// - `series` — rolling and scalar statistics over one temperature column.
/// - `anomaly` — the three selectable anomaly policies.
/// - `seasonal` — per-(city, season) aggregation.
/// - `dispatch` — per-city partitioning and the sequential/parallel runner.

pub mod anomaly;
pub mod dispatch;
pub mod seasonal;
pub mod series;
