//! Percentage helper with zero-division handling

/// Percentage of `part` in `total`, or 0.0 when `total` is zero.
///
/// Counts above 2^53 lose precision in the cast, which does not matter at
/// display resolution.
///
/// # Examples
/// ```
/// use chainstate_dump::utils::math::safe_percentage;
///
/// assert_eq!(safe_percentage(50, 100), 50.0);
/// assert_eq!(safe_percentage(50, 0), 0.0);
/// ```
#[inline]
pub fn safe_percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64) * 100.0
    }
}
