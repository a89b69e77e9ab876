/// City registry for live temperature monitoring.
///
/// Defines the canonical list of cities offered for current-temperature
/// queries, with their metadata. This is the single source of truth for
/// monitorable cities — the credential probe and the verification runner
/// reference cities from here rather than hardcoding names.

// ---------------------------------------------------------------------------
// City metadata
// ---------------------------------------------------------------------------

/// Metadata for a single monitorable city.
pub struct City {
    /// City name as the weather API expects it in the `q` query parameter.
    pub name: &'static str,
    /// ISO 3166 country code.
    pub country: &'static str,
    /// WGS84 latitude.
    pub latitude: f64,
    /// WGS84 longitude.
    pub longitude: f64,
    /// Southern-hemisphere cities get the season-from-date mapping wrong;
    /// see `alert::normalcy::season_for_month`. Flagged here so the caller
    /// can warn.
    pub southern_hemisphere: bool,
}

/// All cities offered for live monitoring, in dashboard menu order.
pub static CITY_REGISTRY: &[City] = &[
    City { name: "New York", country: "US", latitude: 40.7128, longitude: -74.0060, southern_hemisphere: false },
    City { name: "London", country: "GB", latitude: 51.5074, longitude: -0.1278, southern_hemisphere: false },
    City { name: "Paris", country: "FR", latitude: 48.8566, longitude: 2.3522, southern_hemisphere: false },
    City { name: "Tokyo", country: "JP", latitude: 35.6762, longitude: 139.6503, southern_hemisphere: false },
    City { name: "Moscow", country: "RU", latitude: 55.7558, longitude: 37.6173, southern_hemisphere: false },
    City { name: "Sydney", country: "AU", latitude: -33.8688, longitude: 151.2093, southern_hemisphere: true },
    City { name: "Berlin", country: "DE", latitude: 52.5200, longitude: 13.4050, southern_hemisphere: false },
    City { name: "Beijing", country: "CN", latitude: 39.9042, longitude: 116.4074, southern_hemisphere: false },
    City { name: "Rio de Janeiro", country: "BR", latitude: -22.9068, longitude: -43.1729, southern_hemisphere: true },
    City { name: "Dubai", country: "AE", latitude: 25.2048, longitude: 55.2708, southern_hemisphere: false },
    City { name: "Los Angeles", country: "US", latitude: 34.0522, longitude: -118.2437, southern_hemisphere: false },
    City { name: "Singapore", country: "SG", latitude: 1.3521, longitude: 103.8198, southern_hemisphere: false },
    City { name: "Mumbai", country: "IN", latitude: 19.0760, longitude: 72.8777, southern_hemisphere: false },
    City { name: "Cairo", country: "EG", latitude: 30.0444, longitude: 31.2357, southern_hemisphere: false },
    City { name: "Mexico City", country: "MX", latitude: 19.4326, longitude: -99.1332, southern_hemisphere: false },
];

/// Look up a registry city by name, case-insensitively.
pub fn find_city(name: &str) -> Option<&'static City> {
    CITY_REGISTRY
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(name.trim()))
}
