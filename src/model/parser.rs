// File: ./src/model/parser.rs
// Handles the display strings derived from raw timetable values
use chrono::{Datelike, NaiveDate};

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Turns `"2025-09-07 03:15 PM"` into `"7-Sep-2025 03:15 PM"`.
///
/// A bare date formats as the date alone. Returns `None` when the date or
/// time part does not parse, so callers can show a fallback instead.
pub fn format_update_stamp(raw: &str) -> Option<String> {
    let mut parts = raw.split_whitespace();
    let date = NaiveDate::parse_from_str(parts.next()?, "%Y-%m-%d").ok()?;
    let formatted_date = format!("{}-{}-{}", date.day(), MONTHS[date.month0() as usize], date.year());

    let Some(time) = parts.next() else {
        return Some(formatted_date);
    };
    let (hh, mm) = time.split_once(':')?;
    if !is_clock_field(hh) || !is_clock_field(mm) {
        return None;
    }
    let formatted_time = match parts.next() {
        Some(ampm) => format!("{}:{} {}", hh, mm, ampm),
        None => format!("{}:{}", hh, mm),
    };
    Some(format!("{} {}", formatted_date, formatted_time))
}

fn is_clock_field(s: &str) -> bool {
    (1..=2).contains(&s.len()) && s.chars().all(|c| c.is_ascii_digit())
}

/// Batch years are shown without their century: `"2023"` reads `"23"`.
pub fn short_year_label(year: &str) -> &str {
    year.strip_prefix("20").unwrap_or(year)
}
