// crates/cli/src/main.rs
//! cclog binary.
//!
//! Subcommands mirror the shell integration's needs: `list` streams
//! fzf-ready rows, `info` fills the preview pane, `view` prints a
//! colorized transcript, `projects` and `decode` expose the encoded-name
//! decoder for the Ctrl-p / resume bindings.

mod cli;
mod commands;
mod render;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Quiet by default; all user-facing output goes to stdout.
    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Command::List { project_dir } => commands::list::run(project_dir).await,
        Command::Info { file } => commands::info::run(&file).await,
        Command::View { file } => commands::view::run(&file).await,
        Command::Projects => commands::projects::run().await,
        Command::Decode { name } => commands::decode::run(&name),
    }
}
