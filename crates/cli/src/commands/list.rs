// crates/cli/src/commands/list.rs
//! `cclog list` — stream fzf-ready session rows, newest first.

use crate::render;
use anyhow::{Context, Result};
use cclog_core::paths::project_dir_for;
use cclog_core::session::{build_summary_index, parse_session_minimal, session_files};
use std::path::PathBuf;
use tracing::debug;

pub async fn run(project_dir: Option<PathBuf>) -> Result<()> {
    let cwd = std::env::current_dir().context("cannot determine current directory")?;
    let project_dir = match project_dir {
        Some(dir) => dir,
        None => project_dir_for(&cwd)?,
    };

    // Header lines; fzf hides them with --header-lines=4.
    println!("Claude Code Sessions for: {}", cwd.display());
    println!("Enter: Return session ID, Ctrl-v: View log");
    println!("Ctrl-p: Return path, Ctrl-r: Resume conversation");
    println!("TIMESTAMP           Duration Messages  FIRST_MESSAGE");

    let message_width = render::message_width(render::terminal_width());

    let files = session_files(&project_dir)
        .await
        .with_context(|| format!("cannot read project directory {}", project_dir.display()))?;

    // Summary topics label sessions whose first entries carry no user
    // message (e.g. continuations).
    let summaries = build_summary_index(&project_dir).await;

    // Parse and print one by one so fzf shows first results immediately.
    for file in files {
        match parse_session_minimal(&file, Some(&summaries)).await {
            Ok(summary) => println!("{}", render::list_row(&summary, message_width)),
            Err(e) => debug!("skipping {}: {}", file.display(), e),
        }
    }

    Ok(())
}
