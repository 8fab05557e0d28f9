use chrono::{DateTime, Utc};

/// `Mar 1, 2024`.
#[must_use]
pub fn format_date(value: DateTime<Utc>) -> String {
    value.format("%b %-d, %Y").to_string()
}

/// `Mar 1, 2024, 09:05 PM`.
#[must_use]
pub fn format_datetime(value: DateTime<Utc>) -> String {
    value.format("%b %-d, %Y, %I:%M %p").to_string()
}
