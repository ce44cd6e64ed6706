//! Formatting helpers shared by the views.

pub mod http;

use chrono::NaiveDate;

/// Format seconds as `HH:MM:SS`. Hours are not wrapped.
pub fn format_time(seconds: u64) -> String {
    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    let s = seconds % 60;
    format!("{h:02}:{m:02}:{s:02}")
}

/// Percentage with exactly two decimals and a `%` suffix.
pub fn format_percent(value: f64) -> String {
    format!("{value:.2}%")
}

/// Render a number the way the server sent it: no decimals for whole
/// values, shortest form otherwise.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Parse an ISO `YYYY-MM-DD` date.
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Brazilian display format `dd/mm/yyyy`.
pub fn format_date_br(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Re-render an ISO date as `dd/mm/yyyy`; unparseable input is returned as is.
pub fn iso_to_br(raw: &str) -> String {
    parse_iso_date(raw)
        .map(format_date_br)
        .unwrap_or_else(|| raw.to_string())
}
