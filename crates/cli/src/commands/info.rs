// crates/cli/src/commands/info.rs
//! `cclog info` — summary details for the fzf preview pane.

use anyhow::Result;
use cclog_core::format::{format_duration, format_timestamp};
use cclog_core::session::parse_session_minimal;
use std::path::Path;

pub async fn run(file: &Path) -> Result<()> {
    let summary = parse_session_minimal(file, None).await?;

    println!("{:<10} {}", "Session:", summary.session_id);
    println!("{:<10} {}", "Messages:", summary.line_count);
    println!("{:<10} {}", "Started:", format_timestamp(&summary.start_timestamp));
    if summary.last_timestamp != summary.start_timestamp {
        println!("{:<10} {}", "Finished:", format_timestamp(&summary.last_timestamp));
    }
    if summary.duration_seconds() > 0 {
        println!("{:<10} {}", "Duration:", format_duration(summary.duration_seconds()));
    }

    Ok(())
}
