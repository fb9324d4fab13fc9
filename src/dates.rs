//! Tolerant date parsing and formatting
//!
//! Transactions store their origination date as a human-formatted string in
//! one of two UI languages, while billing dates are always ISO. This module is
//! the single place that converts any of those encodings back into a calendar
//! date. It guarantees a closed-world round-trip: every string produced by the
//! formatters below parses back to the same date. It makes no attempt to parse
//! arbitrary human input.

use chrono::{Datelike, NaiveDate};

/// Abbreviated month names used by the English display format ("Dec 8, 2025")
const ENGLISH_MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Abbreviated month names used by the Turkish display format ("8 Ara 2025")
const TURKISH_MONTHS: [&str; 12] = [
    "Oca", "Şub", "Mar", "Nis", "May", "Haz", "Tem", "Ağu", "Eyl", "Eki", "Kas", "Ara",
];

/// Parse a date string in any of the system's own encodings
///
/// Attempts, in order: ISO `YYYY-MM-DD`, Turkish `<day> <month> <year>`,
/// English `<month> <day>, <year>`. Returns `None` on anything else; never
/// panics.
pub fn parse(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    // ISO is the only format carrying a date separator
    if text.contains('-') {
        if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
            return Some(date);
        }
        return None;
    }

    parse_turkish(text).or_else(|| parse_english(text))
}

/// Parse the Turkish display format, e.g. "8 Ara 2025"
fn parse_turkish(text: &str) -> Option<NaiveDate> {
    let mut parts = text.split_whitespace();
    let day: u32 = parts.next()?.parse().ok()?;
    let month = month_number(parts.next()?, &TURKISH_MONTHS)?;
    let year: i32 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parse the English display format, e.g. "Dec 8, 2025"
fn parse_english(text: &str) -> Option<NaiveDate> {
    let mut parts = text.split_whitespace();
    let month = month_number(parts.next()?, &ENGLISH_MONTHS)?;
    let day: u32 = parts.next()?.trim_end_matches(',').parse().ok()?;
    let year: i32 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Look up a month abbreviation in a table, returning its 1-based number
fn month_number(abbrev: &str, table: &[&str; 12]) -> Option<u32> {
    table
        .iter()
        .position(|m| m.eq_ignore_ascii_case(abbrev))
        .map(|i| i as u32 + 1)
}

/// Format a date in the English display style, e.g. "Dec 8, 2025"
pub fn format_english(date: NaiveDate) -> String {
    format!(
        "{} {}, {}",
        ENGLISH_MONTHS[date.month0() as usize],
        date.day(),
        date.year()
    )
}

/// Format a date in the Turkish display style, e.g. "8 Ara 2025"
pub fn format_turkish(date: NaiveDate) -> String {
    format!(
        "{} {} {}",
        date.day(),
        TURKISH_MONTHS[date.month0() as usize],
        date.year()
    )
}

/// Format a date as ISO `YYYY-MM-DD`
pub fn format_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
