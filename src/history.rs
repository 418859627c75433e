//! Prompt/response history log.
//!
//! The log is a single JSON array on disk. Appending reads the whole array,
//! pushes one entry and rewrites the file (temp file + rename), so a crash
//! mid-write never leaves a truncated log behind.
//!
//! There is no cross-process locking: two invocations appending at the same
//! moment can lose one entry.

use crate::error::JesterError;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// `strftime` pattern of entry timestamps (local time, microseconds).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// One recorded exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// ISO-8601 local time of the exchange.
    pub timestamp: String,
    pub prompt: String,
    pub response: String,
}

impl HistoryEntry {
    /// An entry stamped with the current local time.
    pub fn now(prompt: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            prompt: prompt.into(),
            response: response.into(),
        }
    }
}

/// Append-only history stored at one path.
#[derive(Debug, Clone)]
pub struct HistoryLog {
    path: PathBuf,
}

impl HistoryLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All entries in the order they were appended. A missing file is an
    /// empty history.
    pub async fn load(&self) -> Result<Vec<HistoryEntry>, JesterError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(JesterError::HistoryReadFailed {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        serde_json::from_slice(&raw).map_err(|source| JesterError::HistoryCorrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Append one entry, rewriting the file.
    pub async fn append(&self, entry: HistoryEntry) -> Result<(), JesterError> {
        let mut entries = self.load().await?;
        entries.push(entry);

        let json = serde_json::to_string_pretty(&entries)
            .map_err(|e| JesterError::Internal(format!("serialise history: {e}")))?;

        crate::vault::write_atomic(&self.path, json.as_bytes()).await?;
        debug!(
            "History now holds {} entries ({})",
            entries.len(),
            self.path.display()
        );
        Ok(())
    }
}
