// crates/core/src/format.rs
//! Display formatting for timestamps, durations and list-row summaries.

use chrono::{DateTime, Utc};

/// Format a duration in seconds to a compact human-readable form:
/// `42s`, `5m`, `2h 5m`, `3d 4h`.
pub fn format_duration(seconds: i64) -> String {
    let seconds = seconds.max(0);
    if seconds < 60 {
        format!("{seconds}s")
    } else if seconds < 3600 {
        format!("{}m", seconds / 60)
    } else if seconds < 86400 {
        let hours = seconds / 3600;
        let minutes = (seconds % 3600) / 60;
        if minutes > 0 {
            format!("{hours}h {minutes}m")
        } else {
            format!("{hours}h")
        }
    } else {
        let days = seconds / 86400;
        let hours = (seconds % 86400) / 3600;
        if hours > 0 {
            format!("{days}d {hours}h")
        } else {
            format!("{days}d")
        }
    }
}

/// List/info column format: `2026-01-27 10:00:00`.
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// View column format: `10:00:00`; `00:00:00` when the line had no timestamp.
pub fn format_time_of_day(dt: Option<&DateTime<Utc>>) -> String {
    match dt {
        Some(dt) => dt.format("%H:%M:%S").to_string(),
        None => "00:00:00".to_string(),
    }
}

/// Flatten a first-user-message for a single list row: newlines become the
/// literal characters `\n` / `\r`. Empty input renders a placeholder.
pub fn escape_summary(message: &str) -> String {
    if message.is_empty() {
        return "no user message".to_string();
    }
    message.replace('\n', "\\n").replace('\r', "\\r")
}

/// Truncate to at most `max_chars` characters (UTF-8 safe), appending `...`
/// when anything was cut.
pub fn truncate_to_width(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{kept}...")
}
