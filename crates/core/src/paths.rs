// crates/core/src/paths.rs
//! Locations of Claude Code's on-disk session storage.

use crate::decode::ENCODED_DELIMITER;
use crate::error::DiscoveryError;
use std::path::{Path, PathBuf};

/// Returns the path to the Claude projects directory (~/.claude/projects).
///
/// # Errors
/// Returns `DiscoveryError::HomeDirNotFound` if the home directory cannot be
/// determined.
pub fn claude_projects_dir() -> Result<PathBuf, DiscoveryError> {
    let home = dirs::home_dir().ok_or(DiscoveryError::HomeDirNotFound)?;
    Ok(home.join(".claude").join("projects"))
}

/// Encode a working directory the way Claude does: `/`, `.` and `_` all
/// become `-`. This is the forward (lossy) direction of the mapping that
/// [`crate::decode::PathDecoder`] inverts.
pub fn encode_project_path(path: &Path) -> String {
    path.to_string_lossy()
        .chars()
        .map(|c| match c {
            '/' | '.' | '_' => ENCODED_DELIMITER,
            other => other,
        })
        .collect()
}

/// The session directory Claude uses for a given working directory.
pub fn project_dir_for(cwd: &Path) -> Result<PathBuf, DiscoveryError> {
    Ok(claude_projects_dir()?.join(encode_project_path(cwd)))
}
