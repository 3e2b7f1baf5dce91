//! Date/time helpers for API responses.
//!
//! SQLite stores timestamps as UTC text (`YYYY-MM-DD HH:MM:SS`); these
//! helpers turn them into what clients see.

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Format used for comment and board timestamps shown to members.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

fn parse_utc(datetime_str: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(datetime_str) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(datetime_str, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Format a stored UTC datetime string in the given timezone.
///
/// Returns the input unchanged if either the timezone or the datetime
/// cannot be parsed.
pub fn format_datetime(datetime_str: &str, timezone: &str, format: &str) -> String {
    let Ok(tz) = timezone.parse::<Tz>() else {
        return datetime_str.to_string();
    };
    match parse_utc(datetime_str) {
        Some(utc) => utc.with_timezone(&tz).format(format).to_string(),
        None => datetime_str.to_string(),
    }
}

/// Format a stored datetime as `YYYY-MM-DD HH:MM` in the given timezone.
pub fn format_display(datetime_str: &str, timezone: &str) -> String {
    format_datetime(datetime_str, timezone, DISPLAY_FORMAT)
}

/// Convert a database datetime string (`YYYY-MM-DD HH:MM:SS`, UTC) to RFC3339.
pub fn to_rfc3339(datetime_str: &str) -> String {
    format!("{}Z", datetime_str.replace(' ', "T"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_datetime_sqlite_to_seoul() {
        let result = format_datetime("2024-01-15 10:30:00", "Asia/Seoul", "%Y/%m/%d %H:%M");
        assert_eq!(result, "2024/01/15 19:30");
    }

    #[test]
    fn test_format_datetime_rfc3339() {
        let result = format_datetime("2024-01-15T10:30:00+00:00", "UTC", DISPLAY_FORMAT);
        assert_eq!(result, "2024-01-15 10:30");
    }

    #[test]
    fn test_format_datetime_invalid_inputs() {
        assert_eq!(
            format_datetime("2024-01-15 10:30:00", "Invalid/Zone", DISPLAY_FORMAT),
            "2024-01-15 10:30:00"
        );
        assert_eq!(
            format_datetime("not a date", "UTC", DISPLAY_FORMAT),
            "not a date"
        );
    }

    #[test]
    fn test_format_display_crosses_midnight() {
        assert_eq!(
            format_display("2024-12-31 20:05:59", "Asia/Seoul"),
            "2025-01-01 05:05"
        );
    }

    #[test]
    fn test_to_rfc3339() {
        assert_eq!(to_rfc3339("2024-12-31 23:59:59"), "2024-12-31T23:59:59Z");
    }
}
