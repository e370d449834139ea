//! Display Formatting
//!
//! Dates follow the Hebrew locale layout (`d.m.yyyy`), numbers use comma
//! thousands separators.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

pub const DEFAULT_TRUNCATE: usize = 50;

/// Table/clipboard text for a cell value
pub fn format_cell_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(format_cell_value)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| format!("{}: {}", k, format_cell_value(v)))
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

fn parse_date_time(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    for layout in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, layout) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// `2024-05-01T10:00:00` -> `1.5.2024`. Unparseable input is returned as-is.
pub fn format_date(raw: Option<&str>) -> String {
    match raw.filter(|s| !s.trim().is_empty()) {
        None => String::new(),
        Some(s) => parse_date_time(s)
            .map(|dt| dt.format("%-d.%-m.%Y").to_string())
            .unwrap_or_else(|| s.to_string()),
    }
}

pub fn format_date_time(raw: Option<&str>) -> String {
    match raw.filter(|s| !s.trim().is_empty()) {
        None => String::new(),
        Some(s) => parse_date_time(s)
            .map(|dt| dt.format("%-d.%-m.%Y, %H:%M:%S").to_string())
            .unwrap_or_else(|| s.to_string()),
    }
}

/// Up to three fraction digits, grouped thousands
pub fn format_number(num: f64) -> String {
    if !num.is_finite() {
        return String::new();
    }
    let rounded = format!("{:.3}", num.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((&rounded, ""));
    let frac = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if num < 0.0 && (grouped != "0" || !frac.is_empty()) { "-" } else { "" };
    if frac.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac)
    }
}

/// Cut to `max_len` characters and append `...`
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_len).collect();
    format!("{}...", cut)
}

/// `1.5 KB`, `2 MB`; two decimals at most
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let text = format!("{:.2}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", text, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_cell_value() {
        assert_eq!(format_cell_value(&Value::Null), "");
        assert_eq!(format_cell_value(&json!("A1")), "A1");
        assert_eq!(format_cell_value(&json!(12)), "12");
        assert_eq!(format_cell_value(&json!(["a", "b"])), "a, b");
        assert_eq!(format_cell_value(&json!({"Alpha": 2, "Beta": 5})), "Alpha: 2, Beta: 5");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(Some("2024-05-01T10:00:00")), "1.5.2024");
        assert_eq!(format_date(Some("2024-12-31")), "31.12.2024");
        assert_eq!(format_date(None), "");
        assert_eq!(format_date(Some("soon")), "soon");
        assert_eq!(
            format_date_time(Some("2024-05-01T09:05:03.123")),
            "1.5.2024, 09:05:03"
        );
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(1234567.0), "1,234,567");
        assert_eq!(format_number(1234.5), "1,234.5");
        assert_eq!(format_number(-999.125), "-999.125");
        assert_eq!(format_number(100.0), "100");
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", DEFAULT_TRUNCATE), "short");
        assert_eq!(truncate_text("abcdef", 3), "abc...");
        assert_eq!(truncate_text("שלום עולם", 4), "שלום...");
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(500), "500 Bytes");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(10 * 1024 * 1024), "10 MB");
    }
}
