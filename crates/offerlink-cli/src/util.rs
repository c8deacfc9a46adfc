use crate::error::invalid_input;
use anyhow::Result;
use chrono::{Local, TimeZone, Utc};

pub fn now_utc() -> i64 {
    Utc::now().timestamp()
}

pub fn now_utc_ms() -> i64 {
    Utc::now().timestamp_millis()
}

pub fn format_ms_date(ms: i64) -> String {
    match Local.timestamp_millis_opt(ms).single() {
        Some(dt) => dt.format("%Y-%m-%d").to_string(),
        None => "-".to_string(),
    }
}

/// Trims a flag value, mapping blank input to `None`.
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn require_text(label: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(invalid_input(format!("{label} cannot be empty")));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::{format_ms_date, optional_text, require_text};
    use chrono::{Local, TimeZone};

    #[test]
    fn optional_text_drops_blank_values() {
        assert_eq!(optional_text(Some("  ".to_string())), None);
        assert_eq!(optional_text(Some(" Jane ".to_string())).as_deref(), Some("Jane"));
        assert_eq!(optional_text(None), None);
    }

    #[test]
    fn require_text_rejects_blank() {
        assert!(require_text("employee number", " ").is_err());
        assert_eq!(require_text("employee number", " E1 ").expect("text"), "E1");
    }

    #[test]
    fn format_ms_date_uses_local_date() {
        let dt = Local.with_ymd_and_hms(2030, 1, 15, 12, 0, 0).unwrap();
        assert_eq!(format_ms_date(dt.timestamp_millis()), "2030-01-15");
    }
}
