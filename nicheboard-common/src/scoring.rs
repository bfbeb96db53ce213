//! ICE (Impact × Confidence ÷ Effort) scoring for ideas

/// Default rating substituted when impact, confidence or effort is not supplied
pub const DEFAULT_RATING: i32 = 1;

/// Lowest rating accepted on the write path
pub const MIN_RATING: i32 = 1;

/// Highest rating accepted on the write path
pub const MAX_RATING: i32 = 5;

/// Compute the ICE score: `impact * confidence / effort`, rounded to 2 decimals.
///
/// Ratings are not clamped here. An `effort` of zero yields `0.0` instead of
/// dividing by zero.
///
/// # Examples
///
/// ```
/// use nicheboard_common::scoring::calculate_ice_score;
///
/// assert_eq!(calculate_ice_score(4, 3, 2), 6.0);
/// assert_eq!(calculate_ice_score(5, 5, 3), 8.33);
/// assert_eq!(calculate_ice_score(3, 3, 0), 0.0);
/// ```
pub fn calculate_ice_score(impact: i32, confidence: i32, effort: i32) -> f64 {
    if effort == 0 {
        return 0.0;
    }

    let raw = (impact as f64 * confidence as f64) / effort as f64;
    (raw * 100.0).round() / 100.0
}

/// Substitute the default rating for an absent or zero value
pub fn rating_or_default(value: Option<i32>) -> i32 {
    match value {
        Some(v) if v != 0 => v,
        _ => DEFAULT_RATING,
    }
}
