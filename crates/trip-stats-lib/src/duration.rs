//! Human-readable durations

const MS_PER_HOUR: i64 = 3_600_000;
const MS_PER_MINUTE: i64 = 60_000;

/// Format a millisecond duration as `"{hours}h {minutes}m"`
///
/// Seconds are truncated. Negative input is clamped to zero.
pub fn format_duration(ms: i64) -> String {
    let ms = ms.max(0);
    let hours = ms / MS_PER_HOUR;
    let minutes = (ms % MS_PER_HOUR) / MS_PER_MINUTE;
    format!("{hours}h {minutes}m")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero() {
        assert_eq!(format_duration(0), "0h 0m");
    }

    #[test]
    fn test_hours_and_minutes() {
        assert_eq!(format_duration(3_900_000), "1h 5m");
        assert_eq!(format_duration(360_000), "0h 6m");
    }

    #[test]
    fn test_negative_is_clamped() {
        assert_eq!(format_duration(-500), "0h 0m");
        assert_eq!(format_duration(i64::MIN), "0h 0m");
    }

    #[test]
    fn test_truncates_partial_minutes() {
        assert_eq!(format_duration(59_999), "0h 0m");
        assert_eq!(format_duration(119_999), "0h 1m");
        assert_eq!(format_duration(MS_PER_HOUR - 1), "0h 59m");
    }

    #[test]
    fn test_hours_are_not_wrapped_into_days() {
        assert_eq!(format_duration(26 * MS_PER_HOUR + 3 * MS_PER_MINUTE), "26h 3m");
    }
}
