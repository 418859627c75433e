//! Note sink: writes Markdown files into the vault directory.

use crate::error::JesterError;
use chrono::{DateTime, Local};
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Extension appended to every note.
pub const NOTE_EXTENSION: &str = "md";

/// Characters that are path separators or illegal on common filesystems.
static RE_UNSAFE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[/\\:*?"<>|\x00-\x1f]"#).unwrap());

/// Default note name for `-o` without a value: `jester_YYYYmmdd_HHMMSS`.
pub fn default_note_name(now: DateTime<Local>) -> String {
    format!("jester_{}", now.format("%Y%m%d_%H%M%S"))
}

/// Turn user input into a file stem: strip a trailing `.md`, replace unsafe
/// characters with `_`, trim surrounding whitespace and dots.
pub fn sanitize_note_name(name: &str) -> Result<String, JesterError> {
    let trimmed = name.trim();
    let stem = trimmed
        .strip_suffix(".md")
        .or_else(|| trimmed.strip_suffix(".MD"))
        .unwrap_or(trimmed);
    let cleaned = RE_UNSAFE_CHARS.replace_all(stem, "_");
    let cleaned = cleaned.trim().trim_matches('.');

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '_') {
        return Err(JesterError::InvalidNoteName(name.to_string()));
    }
    Ok(cleaned.to_string())
}

/// A vault directory that notes are written into.
#[derive(Debug, Clone)]
pub struct NoteSink {
    dir: PathBuf,
}

impl NoteSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path a note called `name` would be written to.
    pub fn note_path(&self, name: &str) -> Result<PathBuf, JesterError> {
        let stem = sanitize_note_name(name)?;
        Ok(self.dir.join(format!("{stem}.{NOTE_EXTENSION}")))
    }

    /// Write `content` to `<dir>/<name>.md`, replacing any existing note.
    pub async fn save(&self, name: &str, content: &str) -> Result<PathBuf, JesterError> {
        let is_dir = tokio::fs::metadata(&self.dir)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);
        if !is_dir {
            return Err(JesterError::VaultMissing {
                path: self.dir.clone(),
            });
        }

        let path = self.note_path(name)?;
        write_atomic(&path, content.as_bytes()).await?;
        info!("Saved note {}", path.display());
        Ok(path)
    }
}

/// Write `bytes` to `path` through a temp file in the same directory and a
/// rename, so readers never observe a half-written file. The temp file is
/// removed if the rename fails.
pub(crate) async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), JesterError> {
    let path = path.to_path_buf();
    let bytes = bytes.to_vec();
    tokio::task::spawn_blocking(move || write_atomic_blocking(&path, &bytes))
        .await
        .map_err(|e| JesterError::Internal(format!("write task failed: {e}")))?
}

fn write_atomic_blocking(path: &Path, bytes: &[u8]) -> Result<(), JesterError> {
    let write_err = |source| JesterError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    std::fs::create_dir_all(parent).map_err(write_err)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(write_err)?;
    tmp.write_all(bytes).map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}
