//! Human readable renderings of run metrics.

use chrono::{DateTime, Utc};

pub const METERS_PER_MILE: f64 = 1609.34;

/// `"3.11 mi"`
pub fn miles(meters: f64) -> String {
    format!("{:.2} mi", meters / METERS_PER_MILE)
}

/// `h:mm:ss`, negative durations are shown as zero.
pub fn duration(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{}:{:02}:{:02}", hours, minutes, seconds)
}

/// `m:ss` per mile, or `"—"` when there is no meaningful pace.
pub fn pace(seconds_per_mile: f64) -> String {
    if !seconds_per_mile.is_finite() || seconds_per_mile <= 0.0 {
        return "—".to_owned();
    }
    let total = seconds_per_mile as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Title shown for a run that was imported without one.
pub fn default_title(imported_at: &DateTime<Utc>) -> String {
    imported_at.format("%a, %b %-d %Y, %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn miles_have_two_decimals() {
        assert_eq!(miles(5000.0), "3.11 mi");
        assert_eq!(miles(0.0), "0.00 mi");
    }

    #[test]
    fn durations_include_hours() {
        assert_eq!(duration(59.9), "0:00:59");
        assert_eq!(duration(3723.0), "1:02:03");
        assert_eq!(duration(-5.0), "0:00:00");
    }

    #[test]
    fn pace_without_distance_is_a_dash() {
        assert_eq!(pace(0.0), "—");
        assert_eq!(pace(f64::INFINITY), "—");
        assert_eq!(pace(485.5), "8:05");
    }

    #[test]
    fn default_title_uses_the_import_instant() {
        let at = Utc.with_ymd_and_hms(2025, 10, 30, 11, 6, 0).unwrap();
        assert_eq!(default_title(&at), "Thu, Oct 30 2025, 11:06");
    }
}
