use chrono::{DateTime, TimeZone, Utc};
use std::fmt::Display;

/// Countdown text for a prayer starting at `start`, as seen at `now`.
///
/// Any negative remainder reads "Started"; otherwise hours and minutes are
/// truncated, so a prayer starting this very second reads "0h 0m remaining".
pub fn time_remaining(now: DateTime<Utc>, start: DateTime<Utc>) -> String {
    let remaining = start - now;
    if remaining < chrono::Duration::zero() {
        return "Started".to_string();
    }
    let hours = remaining.num_hours();
    let minutes = remaining.num_minutes() % 60;
    format!("{}h {}m remaining", hours, minutes)
}

/// Format an instant as a 12-hour clock, e.g. "05:45 PM".
pub fn format_clock<Tz: TimeZone>(t: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    t.format("%I:%M %p").to_string()
}
