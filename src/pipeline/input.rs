//! Input resolution: validate a user-supplied PDF path.
//!
//! Paths pasted from a file manager often arrive wrapped in quotes; one
//! matching pair is stripped. A leading `~` is expanded to the home directory,
//! since the shell leaves it alone inside quotes. The magic bytes (`%PDF`) are checked up front so callers get a
//! meaningful error rather than a pdfium failure.

use crate::error::JesterError;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolve `input` to an existing, readable PDF file.
pub fn resolve_pdf(input: &str) -> Result<PathBuf, JesterError> {
    let path = expand_home(clean_path(input), dirs::home_dir().as_deref());

    if !path.is_file() {
        return Err(JesterError::FileNotFound { path });
    }

    let mut file = match std::fs::File::open(&path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            return Err(JesterError::PermissionDenied { path });
        }
        Err(_) => return Err(JesterError::FileNotFound { path }),
    };

    let mut magic = [0u8; 4];
    if file.read_exact(&mut magic).is_err() || &magic != b"%PDF" {
        return Err(JesterError::NotAPdf { path, magic });
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(path)
}

/// Trim whitespace, then strip one matching pair of `"` or `'`.
fn clean_path(input: &str) -> &str {
    let trimmed = input.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = trimmed
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    trimmed
}

/// Replace a leading `~` or `~/` with `home`. `~user` forms are left as is.
fn expand_home(path: &str, home: Option<&Path>) -> PathBuf {
    match (path, home) {
        ("~", Some(home)) => home.to_path_buf(),
        (p, Some(home)) if p.starts_with("~/") => home.join(&p[2..]),
        (p, _) => PathBuf::from(p),
    }
}
