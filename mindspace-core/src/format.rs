//! Formatting helpers shared across front ends.

use chrono::{DateTime, Utc};

/// Format a timestamp relative to `now` (e.g., "2m ago").
pub fn format_relative_time_from(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(ts);

    if duration.num_seconds() < 0 {
        "just now".to_string()
    } else if duration.num_seconds() < 60 {
        format!("{}s ago", duration.num_seconds())
    } else if duration.num_minutes() < 60 {
        format!("{}m ago", duration.num_minutes())
    } else if duration.num_hours() < 24 {
        format!("{}h ago", duration.num_hours())
    } else if duration.num_days() < 7 {
        format!("{}d ago", duration.num_days())
    } else {
        ts.format("%b %d").to_string()
    }
}

/// Format a timestamp as relative time from now.
pub fn format_relative_time(ts: DateTime<Utc>) -> String {
    format_relative_time_from(ts, Utc::now())
}

/// Format a mood entry timestamp for lists (e.g., "May 01, 08:30 AM").
pub fn format_entry_time(ts: DateTime<Utc>) -> String {
    ts.format("%b %d, %I:%M %p").to_string()
}

/// Format a countdown as `MM:SS`, or `H:MM:SS` past an hour.
pub fn format_countdown(seconds: u32) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_countdown() {
        assert_eq!(format_countdown(600), "10:00");
        assert_eq!(format_countdown(59), "00:59");
        assert_eq!(format_countdown(3725), "1:02:05");
    }

    #[test]
    fn test_relative_time() {
        let now: DateTime<Utc> = "2024-05-10T12:00:00Z".parse().unwrap();
        assert_eq!(format_relative_time_from(now - Duration::seconds(5), now), "5s ago");
        assert_eq!(format_relative_time_from(now - Duration::hours(3), now), "3h ago");
        assert_eq!(format_relative_time_from(now - Duration::days(10), now), "Apr 30");
        assert_eq!(format_relative_time_from(now + Duration::seconds(5), now), "just now");
    }

    #[test]
    fn test_entry_time() {
        let ts: DateTime<Utc> = "2024-05-01T08:30:00Z".parse().unwrap();
        assert_eq!(format_entry_time(ts), "May 01, 08:30 AM");
    }
}
