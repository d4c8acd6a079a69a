// crates/cli/src/commands/projects.rs
//! `cclog projects` — every known project with its decoded path.
//!
//! This is the repeated-lookup case the decode cache exists for: one
//! decoder and one cache live for the whole listing.

use anyhow::Result;
use cclog_core::decode::{DecodeCache, FsOracle, PathDecoder};
use cclog_core::error::DiscoveryError;
use cclog_core::paths::claude_projects_dir;
use tokio::fs;

pub async fn run() -> Result<()> {
    let projects_dir = claude_projects_dir()?;
    if !projects_dir.exists() {
        return Ok(());
    }

    let mut entries = fs::read_dir(&projects_dir)
        .await
        .map_err(|e| DiscoveryError::io(&projects_dir, e))?;

    let mut projects: Vec<(String, i64)> = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| DiscoveryError::io(&projects_dir, e))?
    {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let encoded = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let mtime = fs::metadata(&path)
            .await
            .ok()
            .and_then(|m| m.modified().ok())
            .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);
        projects.push((encoded, mtime));
    }

    // Most recently active first.
    projects.sort_by(|a, b| b.1.cmp(&a.1));

    let decoder = PathDecoder::new(FsOracle);
    let mut cache = DecodeCache::new();
    for (encoded, _) in &projects {
        let decoded = decoder.decode(&mut cache, encoded);
        println!("{}{}{}", decoded, crate::render::FIELD_SEPARATOR, encoded);
    }

    Ok(())
}
