//! Format - Formatting Utilities

use chrono::{DateTime, Local, NaiveDate, Utc};

/// Format an amount as dollars with thousand separators, e.g. `$1,234.50`
pub fn format_currency(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let cents = (amount.abs() * 100.0).round() as u64;
    format!(
        "{sign}${}.{:02}",
        format_number(cents / 100),
        cents % 100
    )
}

/// Format an optional amount, `N/A` when unknown
pub fn format_optional_currency(amount: Option<f64>) -> String {
    amount.map_or_else(|| "N/A".to_string(), format_currency)
}

/// Format a date as `YYYY-MM-DD`
pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Format a UTC datetime in local time for display
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    let local: DateTime<Local> = dt.with_timezone(&Local);
    local.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Format a ratio as a percentage with one decimal
pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

/// Truncate a string to `max_len` characters with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{head}...")
    }
}

/// Format a number with thousand separators
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let len = s.len();
    let mut result = String::with_capacity(len + len / 3);

    for (i, c) in s.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    result
}
