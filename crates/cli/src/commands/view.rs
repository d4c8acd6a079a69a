// crates/cli/src/commands/view.rs
//! `cclog view` — colorized transcript of one session.

use crate::render;
use anyhow::{Context, Result};
use cclog_core::session::parse_message_line;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};

pub async fn run(file: &Path) -> Result<()> {
    let handle = File::open(file)
        .await
        .with_context(|| format!("cannot open {}", file.display()))?;
    let reader = BufReader::new(handle);
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        if let Some(message) = parse_message_line(&line) {
            println!("{}", render::view_line(&message));
        }
    }

    Ok(())
}
