//! Duration-string parsing.
//!
//! Baby Buddy reports durations as `HH:MM:SS` strings (sometimes `HH:MM`,
//! occasionally a bare number of hours). Parsing never panics: malformed
//! input yields `None`, and [`duration_hours`] folds that to zero so a bad
//! record cannot poison an aggregation.

/// Parses a duration string into fractional hours.
///
/// An empty string is zero duration. `H:M:S` yields `H + M/60 + S/3600`,
/// `H:M` yields `H + M/60`, and a bare number is taken as hours. Anything
/// else (non-numeric parts, negative parts, too many colons) is `None`.
pub fn parse_duration(text: &str) -> Option<f64> {
    if text.is_empty() {
        return Some(0.0);
    }
    let parts = text
        .split(':')
        .map(|part| part.trim().parse::<f64>().ok())
        .collect::<Option<Vec<f64>>>()?;
    if parts.iter().any(|p| *p < 0.0 || p.is_nan()) {
        return None;
    }
    match parts.as_slice() {
        [h, m, s] => Some(h + m / 60.0 + s / 3600.0),
        [h, m] => Some(h + m / 60.0),
        [v] => Some(*v),
        _ => None,
    }
}

/// Duration in hours for an optional raw duration field.
///
/// Missing and malformed values both count as zero; malformed values are
/// logged so a misbehaving server shows up somewhere.
pub fn duration_hours(text: Option<&str>) -> f64 {
    match text {
        None => 0.0,
        Some(raw) => parse_duration(raw).unwrap_or_else(|| {
            tracing::warn!(duration = raw, "malformed duration treated as zero");
            0.0
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[expect(clippy::float_cmp, reason = "exact values intended for fixtures")]
    fn parses_three_part_durations() {
        assert_eq!(parse_duration("01:30:00"), Some(1.5));
        assert_eq!(parse_duration("00:45:00"), Some(0.75));
        assert_eq!(parse_duration("02:00:36"), Some(2.01));
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "exact values intended for fixtures")]
    fn parses_two_part_and_bare_durations() {
        assert_eq!(parse_duration("02:15"), Some(2.25));
        assert_eq!(parse_duration("1.5"), Some(1.5));
        assert_eq!(parse_duration("3"), Some(3.0));
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "exact values intended for fixtures")]
    fn empty_string_is_zero() {
        assert_eq!(parse_duration(""), Some(0.0));
    }

    #[test]
    fn malformed_input_is_none() {
        assert_eq!(parse_duration("ab:cd"), None);
        assert_eq!(parse_duration("1:2:3:4"), None);
        assert_eq!(parse_duration("-1:30"), None);
        assert_eq!(parse_duration("1:-5:00"), None);
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "exact values intended for fixtures")]
    fn duration_hours_folds_missing_and_malformed_to_zero() {
        assert_eq!(duration_hours(None), 0.0);
        assert_eq!(duration_hours(Some("garbage")), 0.0);
        assert_eq!(duration_hours(Some("01:30:00")), 1.5);
    }
}
