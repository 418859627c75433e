//! Error types for the jester library.
//!
//! Two error types reflect two failure scopes:
//!
//! * [`JesterError`]: **Fatal.** The requested action cannot complete
//!   (missing credential, unreadable PDF, OCR tool missing, AI call failed
//!   during a conversion, history or note write failed).
//!
//! * [`PageError`]: a single page could not be recognised. A conversion has
//!   no partial-output mode, so the orchestrator turns the first `PageError`
//!   into [`JesterError::PageFailed`] and aborts the whole document.
//!
//! A failed chat call on its own is *not* an error type here: the AI client
//! reports it as [`crate::ai::AiReply::Failure`] and each caller decides what
//! that means for them.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the jester library.
#[derive(Debug, Error)]
pub enum JesterError {
    // ── Configuration errors ──────────────────────────────────────────────
    /// No API credential was supplied.
    #[error("API key not found.\nSet OPENROUTER_API_KEY in your environment or pass --api-key.")]
    MissingApiKey,

    /// A vault feature was requested but no vault directory is configured.
    #[error("Obsidian vault path not set.\nSet OBSIDIAN_VAULT_PATH or pass --vault <DIR>.")]
    VaultNotConfigured,

    /// The configured vault path does not point at a directory.
    #[error("Vault directory '{path}' does not exist or is not a directory")]
    VaultMissing { path: PathBuf },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// pdfium-render returned an error for a specific page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium or install pdfium where the system loader can find it."
    )]
    PdfiumBindingFailed(String),

    // ── OCR errors ────────────────────────────────────────────────────────
    /// The OCR command could not be started.
    #[error("OCR engine '{command}' is not available: {detail}\nInstall tesseract or set TESSERACT_CMD.")]
    OcrUnavailable { command: String, detail: String },

    /// One page failed; the whole conversion is abandoned.
    #[error(transparent)]
    PageFailed(#[from] PageError),

    // ── LLM errors ────────────────────────────────────────────────────────
    /// The chat endpoint did not produce an answer.
    #[error("LLM API error: {message}")]
    LlmApiError { message: String },

    // ── Persistence errors ────────────────────────────────────────────────
    /// The history file exists but could not be read.
    #[error("Failed to read history file '{path}': {source}")]
    HistoryReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The history file is not a JSON array of entries.
    #[error("History file '{path}' is not valid JSON: {source}")]
    HistoryCorrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Could not create or write an output file (note, draft or history).
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A note name is empty after sanitising.
    #[error("Invalid note name '{0}'")]
    InvalidNoteName(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A failure confined to one page of a conversion.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PageError {
    /// The recogniser ran but reported an error for this page.
    #[error("Page {page}: OCR failed: {detail}")]
    OcrFailed { page: usize, detail: String },

    /// The blocking worker running this page panicked or was cancelled.
    #[error("Page {page}: OCR worker stopped unexpectedly: {detail}")]
    WorkerPanicked { page: usize, detail: String },
}

impl PageError {
    /// 1-indexed page number the error refers to.
    pub fn page(&self) -> usize {
        match self {
            PageError::OcrFailed { page, .. } | PageError::WorkerPanicked { page, .. } => *page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_error_display_names_page() {
        let e = PageError::OcrFailed {
            page: 4,
            detail: "tesseract exited with 1".into(),
        };
        assert_eq!(e.page(), 4);
        assert!(e.to_string().contains("Page 4"), "got: {e}");
    }

    #[test]
    fn page_error_converts_transparently() {
        let e: JesterError = PageError::WorkerPanicked {
            page: 2,
            detail: "boom".into(),
        }
        .into();
        assert!(matches!(e, JesterError::PageFailed(_)));
        assert!(e.to_string().starts_with("Page 2"));
    }

    #[test]
    fn missing_key_mentions_variable() {
        let msg = JesterError::MissingApiKey.to_string();
        assert!(msg.contains("OPENROUTER_API_KEY"), "got: {msg}");
    }

    #[test]
    fn vault_not_configured_mentions_variable() {
        let msg = JesterError::VaultNotConfigured.to_string();
        assert!(msg.contains("OBSIDIAN_VAULT_PATH"), "got: {msg}");
    }
}
