//! Date helper functions
//!
//! The `date` template filter re-renders a front-matter date string with a
//! restricted Jekyll-style token vocabulary. Only `%Y`, `%m`, `%d`, `%B`
//! and `%b` are understood; everything else in the format string passes
//! through verbatim.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const MONTH_ABBREVS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Re-render a date string according to a restricted format vocabulary.
///
/// If `value` cannot be parsed as a calendar date, it is returned
/// unchanged — malformed dates in hand-authored content should degrade to
/// passthrough, not break the render.
///
/// # Examples
/// ```ignore
/// format_date("2025-06-14", "%Y.%m.%d") // -> "2025.06.14"
/// format_date("2025-06-14", "%B %d, %Y") // -> "June 14, 2025"
/// ```
pub fn format_date(value: &str, format: &str) -> String {
    match parse_date(value) {
        Some(date) => render_format(&date, format),
        None => value.to_string(),
    }
}

/// Parse a date string in the formats content files actually use.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    let date_formats = ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%m/%d/%Y"];
    for fmt in date_formats {
        if let Ok(d) = NaiveDate::parse_from_str(value, fmt) {
            return Some(d);
        }
    }

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt.date());
        }
    }

    // RFC 3339 timestamps as emitted by some export tools
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }

    None
}

/// Expand the restricted token set against a parsed date.
fn render_format(date: &NaiveDate, format: &str) -> String {
    let month_index = date.month0() as usize;
    let mut out = String::with_capacity(format.len() + 8);
    let mut chars = format.chars();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('Y') => out.push_str(&format!("{:04}", date.year())),
            Some('m') => out.push_str(&format!("{:02}", date.month())),
            Some('d') => out.push_str(&format!("{:02}", date.day())),
            Some('B') => out.push_str(MONTH_NAMES[month_index]),
            Some('b') => out.push_str(MONTH_ABBREVS[month_index]),
            // Unrecognized tokens are left verbatim
            Some(other) => {
                out.push('%');
                out.push(other);
            }
            None => out.push('%'),
        }
    }

    out
}
