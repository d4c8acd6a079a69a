// crates/cli/src/render.rs
//! Terminal-width detection and line rendering for the list and view output.

use cclog_core::format::{
    escape_summary, format_duration, format_time_of_day, format_timestamp, truncate_to_width,
};
use cclog_core::session::{MessageKind, MessageLine, SessionSummary};
use owo_colors::{OwoColorize, XtermColors};

/// Field separator between the visible row and the session id. fzf is run
/// with a delimiter on this non-printable character so the id never shows.
pub const FIELD_SEPARATOR: char = '\x1f';

/// Visible columns left of the message: TIMESTAMP(19) + Duration(8) +
/// Messages(8) + spacing(6).
const FIXED_COLUMNS: usize = 41;

/// Never squeeze the message column below this.
const MIN_MESSAGE_WIDTH: usize = 20;

/// Terminal width in columns: `COLUMNS` env override first (tests, some
/// terminals), then the tty, then 80.
pub fn terminal_width() -> usize {
    if let Ok(cols) = std::env::var("COLUMNS") {
        if let Ok(cols) = cols.parse::<usize>() {
            return cols;
        }
    }
    match crossterm::terminal::size() {
        Ok((cols, _rows)) => cols as usize,
        Err(_) => 80,
    }
}

/// Width available for the message column at a given terminal width.
pub fn message_width(terminal_width: usize) -> usize {
    terminal_width
        .saturating_sub(FIXED_COLUMNS + 2)
        .max(MIN_MESSAGE_WIDTH)
}

/// One fzf row: visible columns, then the hidden session id.
pub fn list_row(summary: &SessionSummary, message_width: usize) -> String {
    let message = truncate_to_width(&escape_summary(summary.display_message()), message_width);
    format!(
        "{:<19} {:>8} {:>8}  {}{}{}",
        format_timestamp(&summary.start_timestamp),
        format_duration(summary.duration_seconds()),
        summary.line_count,
        message,
        FIELD_SEPARATOR,
        summary.session_id,
    )
}

/// One colorized transcript line: cyan user, white assistant, gray tool
/// traffic. Newlines inside the message flatten to spaces.
pub fn view_line(message: &MessageLine) -> String {
    let label = match message.kind {
        MessageKind::User => "User      ",
        MessageKind::Assistant => "Assistant ",
    };
    let time = format_time_of_day(message.timestamp.as_ref());
    let text = message.text.replace('\n', " ");
    let line = format!("{label}{time}  {text}");

    if message.is_tool {
        // 256-color gray (xterm 244), dimmer than the bright-black ANSI slot.
        line.color(XtermColors::Gray).to_string()
    } else {
        match message.kind {
            MessageKind::User => line.cyan().to_string(),
            MessageKind::Assistant => line.white().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::path::PathBuf;

    fn summary() -> SessionSummary {
        SessionSummary {
            session_id: "abc-123".to_string(),
            file_path: PathBuf::from("/x/abc-123.jsonl"),
            start_timestamp: Utc.with_ymd_and_hms(2026, 1, 27, 10, 0, 0).unwrap(),
            last_timestamp: Utc.with_ymd_and_hms(2026, 1, 27, 10, 5, 0).unwrap(),
            first_user_message: "Fix the login bug".to_string(),
            modified_at: 0,
            size_bytes: 123,
            line_count: 42,
            matched_summaries: None,
        }
    }

    #[test]
    fn test_message_width_floor() {
        assert_eq!(message_width(40), MIN_MESSAGE_WIDTH);
        assert_eq!(message_width(120), 120 - FIXED_COLUMNS - 2);
    }

    #[test]
    fn test_list_row_layout() {
        let row = list_row(&summary(), 40);
        let (visible, id) = row.split_once(FIELD_SEPARATOR).unwrap();
        assert_eq!(id, "abc-123");
        assert!(visible.starts_with("2026-01-27 10:00:00"));
        assert!(visible.contains("5m"));
        assert!(visible.contains("42"));
        assert!(visible.ends_with("Fix the login bug"));
    }

    #[test]
    fn test_list_row_truncates_message() {
        let mut s = summary();
        s.first_user_message = "x".repeat(100);
        let row = list_row(&s, 20);
        let (visible, _) = row.split_once(FIELD_SEPARATOR).unwrap();
        assert!(visible.ends_with("..."));
    }

    #[test]
    fn test_view_line_flattens_newlines() {
        let line = view_line(&MessageLine {
            kind: MessageKind::Assistant,
            is_tool: false,
            timestamp: None,
            text: "one\ntwo".to_string(),
        });
        assert!(line.contains("one two"));
        assert!(line.contains("Assistant 00:00:00"));
    }

    #[test]
    fn test_list_row_falls_back_to_matched_summary() {
        let mut s = summary();
        s.first_user_message = String::new();
        s.matched_summaries = Some(vec!["Refactor Discussion".to_string()]);
        let row = list_row(&s, 40);
        let (visible, _) = row.split_once(FIELD_SEPARATOR).unwrap();
        assert!(visible.ends_with("Refactor Discussion"));
    }

    #[test]
    fn test_view_line_tool_traffic_uses_256_color_gray() {
        let line = view_line(&MessageLine {
            kind: MessageKind::Assistant,
            is_tool: true,
            timestamp: None,
            text: "Tool: Bash".to_string(),
        });
        assert!(line.contains("38;5;244"));
    }

    #[test]
    fn test_view_line_labels() {
        let line = view_line(&MessageLine {
            kind: MessageKind::User,
            is_tool: false,
            timestamp: Some(Utc.with_ymd_and_hms(2026, 1, 27, 9, 30, 5).unwrap()),
            text: "hi".to_string(),
        });
        assert!(line.contains("User      09:30:05"));
    }
}
