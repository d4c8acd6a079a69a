// crates/cli/src/cli.rs
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Browse Claude Code session logs.
#[derive(Debug, Parser)]
#[command(name = "cclog", version, about)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List sessions for a project directory (fzf-ready rows)
    List {
        /// Project directory under ~/.claude/projects; defaults to the one
        /// for the current working directory
        project_dir: Option<PathBuf>,
    },
    /// Show summary details for one session file
    Info {
        /// Path to a session .jsonl file
        file: PathBuf,
    },
    /// Print a session's conversation, colorized
    View {
        /// Path to a session .jsonl file
        file: PathBuf,
    },
    /// List all known projects with their decoded paths
    Projects,
    /// Decode an encoded project directory name to a filesystem path
    Decode {
        /// Encoded name, e.g. `-home-user-my-project`
        name: String,
    },
}
