//! Time formatting for duration labels

/// Format a duration in seconds as `mm:ss.cc`, or `hh:mm:ss.cc` from one hour up.
///
/// Centiseconds are truncated, not rounded. Negative or non-finite input
/// has no meaningful duration and formats as `"?"`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "?".to_string();
    }

    let total_millis = (seconds * 1000.0) as u64;
    let centis = (total_millis % 1000) / 10;
    let total_secs = total_millis / 1000;
    let secs = total_secs % 60;
    let mins = (total_secs / 60) % 60;
    let hours = total_secs / 3600;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}.{:02}", hours, mins, secs, centis)
    } else {
        format!("{:02}:{:02}.{:02}", mins, secs, centis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minutes_and_centis() {
        assert_eq!(format_time(0.0), "00:00.00");
        assert_eq!(format_time(4.0), "00:04.00");
        assert_eq!(format_time(83.456), "01:23.45");
    }

    #[test]
    fn test_hours() {
        assert_eq!(format_time(3600.0), "01:00:00.00");
        assert_eq!(format_time(3725.5), "01:02:05.50");
    }

    #[test]
    fn test_invalid_input() {
        assert_eq!(format_time(-1.0), "?");
        assert_eq!(format_time(f64::NAN), "?");
        assert_eq!(format_time(f64::INFINITY), "?");
    }
}
