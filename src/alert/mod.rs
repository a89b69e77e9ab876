/// Live-reading assessment.
///
/// Submodules:
/// - `normalcy` — compares a current temperature against the historical
///   interquartile range for the season in effect now.

pub mod normalcy;
