use crate::result::{Count, Duration};

/// Rendered for a count the API left out.
pub const MISSING_COUNT: &str = "0";

pub fn format_count(count: Option<&Count>) -> String {
    match count {
        Some(Count::Number(value)) => format_number(*value),
        Some(Count::Text(text)) => match text.trim() {
            "" => MISSING_COUNT.to_string(),
            text => text
                .parse()
                .map(format_number)
                .unwrap_or_else(|_| text.to_string()),
        },
        None => MISSING_COUNT.to_string(),
    }
}

/// Abbreviates with K/M suffixes at one decimal place.
pub fn format_number(value: u64) -> String {
    if value >= 1_000_000 {
        format!("{:.1}M", value as f64 / 1_000_000.0)
    } else if value >= 1_000 {
        format!("{:.1}K", value as f64 / 1_000.0)
    } else {
        value.to_string()
    }
}

pub fn format_duration(duration: &Duration) -> String {
    match duration {
        Duration::Seconds(seconds) => format_seconds(*seconds),
        Duration::Formatted(text) => text.clone(),
    }
}

pub fn format_seconds(seconds: u64) -> String {
    let minutes = seconds / 60;
    let secs = seconds % 60;
    if minutes > 0 {
        format!("{minutes}:{secs:02}")
    } else {
        format!("{secs}s")
    }
}
