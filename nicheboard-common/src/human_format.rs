//! Human-readable number and date formatting
//!
//! Display helpers used by the admin tooling. Dates render in UTC using the
//! US English short-month layout.

use chrono::{DateTime, Utc};

/// Format an integer with comma thousands separators.
///
/// ```
/// use nicheboard_common::human_format::format_number;
///
/// assert_eq!(format_number(2500000), "2,500,000");
/// assert_eq!(format_number(-1234), "-1,234");
/// assert_eq!(format_number(999), "999");
/// ```
pub fn format_number(num: i64) -> String {
    let digits = num.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if num < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Format a timestamp as `Jan 5, 2024`
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Format a timestamp as `Jan 5, 2024, 03:04 PM`
pub fn format_date_time(date: &DateTime<Utc>) -> String {
    date.format("%b %-d, %Y, %I:%M %p").to_string()
}
