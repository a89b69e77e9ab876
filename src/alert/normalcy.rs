/// Normalcy check for live temperature readings.
///
/// A live reading is compared against the historical interquartile range of
/// the city's profile for the season in effect "now". The season-from-date
/// mapping uses the Northern-hemisphere convention (Dec/Jan/Feb = winter,
/// Mar/Apr/May = spring, Jun/Jul/Aug = summer, Sep/Oct/Nov = autumn). The
/// mapping inverts for Southern-hemisphere cities such as Sydney or Rio de
/// Janeiro; that is a known, documented limitation. `cities::City` flags the
/// affected registry entries so callers can warn.
///
/// # Clock injection
/// `current_season_at` accepts a `now: DateTime<Utc>` parameter rather than
/// calling `Utc::now()` internally, so season resolution is deterministic in
/// tests. `current_season` is the thin real-clock wrapper.

use chrono::{DateTime, Datelike, Utc};

use crate::model::{Normalcy, Season, SeasonalProfile};

// ---------------------------------------------------------------------------
// Season from date
// ---------------------------------------------------------------------------

/// Map a calendar month to its Northern-hemisphere season.
pub fn season_for_month(month: u32) -> Season {
    match month {
        12 | 1 | 2 => Season::Winter,
        3 | 4 | 5 => Season::Spring,
        6 | 7 | 8 => Season::Summer,
        _ => Season::Autumn,
    }
}

/// The season in effect at `now`. Use this in tests with a fixed timestamp.
pub fn current_season_at(now: DateTime<Utc>) -> Season {
    season_for_month(now.month())
}

/// Convenience wrapper over the real clock. Use `current_season_at` in tests
/// to keep them deterministic.
pub fn current_season() -> Season {
    current_season_at(Utc::now())
}

// ---------------------------------------------------------------------------
// Normalcy check
// ---------------------------------------------------------------------------

/// Compare a current temperature against a seasonal profile's interquartile
/// range.
///
/// Boundary readings count as normal: q1 <= t <= q3 is NORMAL, strictly
/// above q3 is ABOVE RANGE, strictly below q1 is BELOW RANGE.
pub fn check_normalcy(current_temperature: f64, profile: &SeasonalProfile) -> Normalcy {
    if current_temperature > profile.q3 {
        Normalcy::AboveRange
    } else if current_temperature < profile.q1 {
        Normalcy::BelowRange
    } else {
        Normalcy::Normal
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
