//! Display formatting for money and dates (Indonesian conventions).

use chrono::{Datelike, NaiveDate};

use crate::api::models::parse_api_date;

const MONTHS: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// Format an amount as rupiah: `Rp 1.250.000`, `-Rp 5.000`.
///
/// Rounds to whole rupiah; non-finite values render as `Rp 0`.
pub fn rupiah(amount: f64) -> String {
    if !amount.is_finite() {
        return "Rp 0".to_string();
    }
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    format!("{sign}Rp {grouped}")
}

/// `19 Oktober 2026`.
pub fn long_date(date: NaiveDate) -> String {
    format!(
        "{} {} {}",
        date.day(),
        MONTHS[date.month0() as usize],
        date.year()
    )
}

/// Format a date string from the API, showing it verbatim if it can't be
/// parsed.
pub fn api_date(raw: &str) -> String {
    parse_api_date(raw)
        .map(long_date)
        .unwrap_or_else(|| raw.to_string())
}

/// Shorten `text` to at most `max` characters, ending in `…` when cut.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept.trim_end())
}
