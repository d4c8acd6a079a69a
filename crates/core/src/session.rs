// crates/core/src/session.rs
//! Minimal scanning of Claude Code JSONL session files.
//!
//! The list and info views only need a handful of facts per session (first
//! timestamp, first user message, line count, last timestamp), so this
//! module does a single streaming pass instead of materializing every
//! message. Malformed lines are skipped with a debug log, never an error.

use crate::error::ParseError;
use chrono::{DateTime, Utc};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

/// Only the first lines of a session are searched for the user's opening
/// message; anything later is tool traffic or follow-ups.
const FIRST_MESSAGE_WINDOW: usize = 20;

/// Summary files are tiny; anything bigger is a real conversation and is
/// never scanned for summary entries.
pub const SUMMARY_FILE_MAX_BYTES: u64 = 10 * 1024;

/// Map from `leafUuid` to summary text, built from the small summary files
/// Claude Code writes alongside sessions.
pub type SummaryIndex = HashMap<String, String>;

/// Summary facts for one session file, used by both the list and info views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Session id (the file stem).
    pub session_id: String,
    pub file_path: PathBuf,
    pub start_timestamp: DateTime<Utc>,
    /// Timestamp of the last entry; equals `start_timestamp` when the last
    /// line carries none.
    pub last_timestamp: DateTime<Utc>,
    /// First user message, command tags stripped. Empty when the session
    /// has none.
    pub first_user_message: String,
    /// Unix mtime of the file, seconds.
    pub modified_at: i64,
    pub size_bytes: u64,
    pub line_count: usize,
    /// Summary topics whose `leafUuid` points at an assistant entry in this
    /// session, in order of appearance. `None` when nothing matched.
    pub matched_summaries: Option<Vec<String>>,
}

impl SessionSummary {
    pub fn duration_seconds(&self) -> i64 {
        (self.last_timestamp - self.start_timestamp)
            .num_seconds()
            .max(0)
    }

    /// Text shown in list rows: the first user message, falling back to the
    /// newest matched summary when the session opens without one.
    pub fn display_message(&self) -> &str {
        if !self.first_user_message.is_empty() {
            return &self.first_user_message;
        }
        self.matched_summaries
            .as_deref()
            .and_then(|s| s.last())
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Parse a session file in one streaming pass.
///
/// - The first line bearing a parseable `timestamp` sets the start.
/// - The first user message is only searched within the opening
///   [`FIRST_MESSAGE_WINDOW`] lines.
/// - The last non-empty line is re-parsed for the end timestamp, falling
///   back to the start when it has none.
/// - Every line (including blank ones) counts toward `line_count`.
/// - With a non-empty `summaries` index, assistant `uuid`s are matched
///   against it to collect the session's summary topics.
///
/// # Errors
/// - `ParseError::NotFound` / `PermissionDenied` / `Io` for unreadable files
/// - `ParseError::NoTimestamp` when no line carries a parseable timestamp
pub async fn parse_session_minimal(
    file_path: &Path,
    summaries: Option<&SummaryIndex>,
) -> Result<SessionSummary, ParseError> {
    let metadata = fs::metadata(file_path)
        .await
        .map_err(|e| ParseError::io(file_path, e))?;

    let file = fs::File::open(file_path)
        .await
        .map_err(|e| ParseError::io(file_path, e))?;
    let reader = BufReader::new(file);
    let mut lines = reader.lines();

    let summaries = summaries.filter(|index| !index.is_empty());
    let mut start_timestamp: Option<DateTime<Utc>> = None;
    let mut first_user_message = String::new();
    let mut last_line: Option<String> = None;
    let mut line_count = 0usize;
    let mut matched: Vec<String> = Vec::new();
    let mut matched_uuids: HashSet<String> = HashSet::new();

    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| ParseError::io(file_path, e))?
    {
        line_count += 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let value: serde_json::Value = match serde_json::from_str(trimmed) {
            Ok(v) => v,
            Err(e) => {
                debug!("Skipping malformed JSON at line {} in {:?}: {}", line_count, file_path, e);
                last_line = Some(trimmed.to_string());
                continue;
            }
        };

        if start_timestamp.is_none() {
            start_timestamp = extract_timestamp(&value);
        }

        if line_count <= FIRST_MESSAGE_WINDOW && first_user_message.is_empty() {
            if let Some(msg) = extract_user_message(&value) {
                let cleaned = clean_command_tags(&msg);
                if !cleaned.is_empty() {
                    first_user_message = cleaned;
                }
            }
        }

        if let Some(index) = summaries {
            if value.get("type").and_then(|t| t.as_str()) == Some("assistant") {
                if let Some(uuid) = value.get("uuid").and_then(|u| u.as_str()) {
                    if let Some(text) = index.get(uuid) {
                        if matched_uuids.insert(uuid.to_string()) {
                            matched.push(text.clone());
                        }
                    }
                }
            }
        }

        last_line = Some(trimmed.to_string());
    }

    let start_timestamp = start_timestamp.ok_or_else(|| ParseError::NoTimestamp {
        path: file_path.to_path_buf(),
    })?;

    let last_timestamp = last_line
        .and_then(|l| serde_json::from_str::<serde_json::Value>(&l).ok())
        .and_then(|v| extract_timestamp(&v))
        .unwrap_or(start_timestamp);

    let modified_at = metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0);

    Ok(SessionSummary {
        session_id: file_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default(),
        file_path: file_path.to_path_buf(),
        start_timestamp,
        last_timestamp,
        first_user_message,
        modified_at,
        size_bytes: metadata.len(),
        line_count,
        matched_summaries: (!matched.is_empty()).then_some(matched),
    })
}

/// Index `{"type":"summary"}` entries across a project directory.
///
/// Claude Code stores conversation summaries as small standalone `.jsonl`
/// files keyed by `leafUuid`, so only files up to
/// [`SUMMARY_FILE_MAX_BYTES`] are scanned and full conversations are never
/// read twice. Unreadable files and malformed lines are skipped with a
/// debug log; the index is simply empty when the directory is unreadable.
pub async fn build_summary_index(project_dir: &Path) -> SummaryIndex {
    let mut index = SummaryIndex::new();
    let mut entries = match fs::read_dir(project_dir).await {
        Ok(entries) => entries,
        Err(e) => {
            debug!("Cannot read {:?} for summary index: {}", project_dir, e);
            return index;
        }
    };

    while let Ok(Some(entry)) = entries.next_entry().await {
        let path = entry.path();
        if path.extension().map(|e| e != "jsonl").unwrap_or(true) {
            continue;
        }
        let size = match fs::metadata(&path).await {
            Ok(m) => m.len(),
            Err(_) => continue,
        };
        if size > SUMMARY_FILE_MAX_BYTES {
            continue;
        }
        if let Err(e) = index_summary_file(&path, &mut index).await {
            debug!("Skipping summary candidate {:?}: {}", path, e);
        }
    }

    index
}

async fn index_summary_file(path: &Path, index: &mut SummaryIndex) -> std::io::Result<()> {
    let file = fs::File::open(path).await?;
    let mut lines = BufReader::new(file).lines();

    while let Some(line) = lines.next_line().await? {
        let value: serde_json::Value = match serde_json::from_str(line.trim()) {
            Ok(v) => v,
            Err(_) => continue,
        };
        if value.get("type").and_then(|t| t.as_str()) != Some("summary") {
            continue;
        }
        let uuid = value.get("leafUuid").and_then(|v| v.as_str());
        let text = value.get("summary").and_then(|v| v.as_str());
        if let (Some(uuid), Some(text)) = (uuid, text) {
            index.insert(uuid.to_string(), text.to_string());
        }
    }

    Ok(())
}

/// All `.jsonl` files in a project directory, newest mtime first.
pub async fn session_files(project_dir: &Path) -> Result<Vec<PathBuf>, std::io::Error> {
    let mut entries = fs::read_dir(project_dir).await?;
    let mut files: Vec<(PathBuf, i64)> = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().map(|e| e != "jsonl").unwrap_or(true) {
            continue;
        }
        let mtime = match fs::metadata(&path).await {
            Ok(m) => m
                .modified()
                .ok()
                .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
                .map(|d| d.as_secs() as i64)
                .unwrap_or(0),
            Err(_) => continue,
        };
        files.push((path, mtime));
    }

    files.sort_by(|a, b| b.1.cmp(&a.1));
    Ok(files.into_iter().map(|(p, _)| p).collect())
}

/// Role of a rendered conversation line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    User,
    Assistant,
}

/// One displayable line of a session, extracted for the view feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageLine {
    pub kind: MessageKind,
    /// True for tool traffic (tool_use / tool_result blocks).
    pub is_tool: bool,
    pub timestamp: Option<DateTime<Utc>>,
    pub text: String,
}

/// Extract a displayable message from one raw JSONL line.
///
/// Returns `None` for non-message lines (summaries, system events,
/// malformed JSON) so callers can simply skip them.
pub fn parse_message_line(line: &str) -> Option<MessageLine> {
    let value: serde_json::Value = serde_json::from_str(line.trim()).ok()?;

    let kind = match value.get("type").and_then(|t| t.as_str()) {
        Some("user") => MessageKind::User,
        Some("assistant") => MessageKind::Assistant,
        _ => return None,
    };

    let timestamp = extract_timestamp(&value);
    let content = value.get("message").and_then(|m| m.get("content"));

    let (is_tool, text) = match content {
        Some(serde_json::Value::String(s)) => (false, s.clone()),
        Some(serde_json::Value::Array(blocks)) if !blocks.is_empty() => {
            let first = &blocks[0];
            let block_type = first.get("type").and_then(|t| t.as_str());
            match (kind, block_type) {
                (MessageKind::User, Some("tool_result")) => {
                    let id = first
                        .get("tool_use_id")
                        .and_then(|v| v.as_str())
                        .unwrap_or("unknown");
                    (true, format!("Tool: {id}"))
                }
                (MessageKind::Assistant, Some("tool_use")) => {
                    let name = first
                        .get("name")
                        .and_then(|v| v.as_str())
                        .unwrap_or("unknown");
                    (true, format!("Tool: {name}"))
                }
                (_, Some("text")) => (
                    false,
                    first
                        .get("text")
                        .and_then(|v| v.as_str())
                        .unwrap_or_default()
                        .to_string(),
                ),
                _ => (false, first.to_string()),
            }
        }
        Some(other) => (false, other.to_string()),
        // A user/assistant entry without content still gets a (blank) line,
        // so the transcript keeps its shape.
        None => (false, String::new()),
    };

    Some(MessageLine {
        kind,
        is_tool,
        timestamp,
        text,
    })
}

/// Parse the `timestamp` field of a JSONL entry (RFC 3339, `Z` accepted).
pub fn extract_timestamp(value: &serde_json::Value) -> Option<DateTime<Utc>> {
    let raw = value.get("timestamp")?.as_str()?;
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Extract the user message text from a JSONL entry, if it is one.
///
/// Handles both string content and block arrays (first non-empty `text`
/// block wins).
pub fn extract_user_message(value: &serde_json::Value) -> Option<String> {
    if value.get("type").and_then(|t| t.as_str()) != Some("user") {
        return None;
    }
    match value.get("message")?.get("content")? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Array(blocks) => blocks.iter().find_map(|b| {
            if b.get("type").and_then(|t| t.as_str()) == Some("text") {
                let text = b.get("text").and_then(|v| v.as_str()).unwrap_or_default();
                (!text.is_empty()).then(|| text.to_string())
            } else {
                None
            }
        }),
        _ => None,
    }
}

/// Strip `<command-name>` / `<command-args>` wrappers that slash commands
/// leave in the raw message.
pub fn clean_command_tags(content: &str) -> String {
    let tag_regex = Regex::new(r"(?s)<command-name>.*?</command-name>\s*").unwrap();
    let args_regex = Regex::new(r"(?s)<command-args>.*?</command-args>\s*").unwrap();

    let cleaned = tag_regex.replace_all(content, "");
    let cleaned = args_regex.replace_all(&cleaned, "");
    cleaned.trim().to_string()
}
