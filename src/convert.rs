//! Conversion driver: PDF → OCR → AI cleanup → vault note.
//!
//! Split into two stages so the caller can talk to the user in between:
//!
//! 1. [`convert`] resolves the PDF, renders and OCRs every page, sends the
//!    aggregate text to the model once and returns a [`ConversionDraft`].
//!    Nothing is written.
//! 2. [`save_draft`] writes the draft's Markdown under the chosen name.
//!
//! Any failure in stage 1 (bad input, one failed page, a failed AI reply)
//! aborts the conversion, so a half-converted document never reaches disk.

use crate::ai::AiClient;
use crate::config::{AppConfig, ConversionConfig};
use crate::error::JesterError;
use crate::output::{AggregateDocument, ConversionDraft, ConversionStats};
use crate::pipeline::ocr::{TesseractRecognizer, TextRecognizer};
use crate::pipeline::{input, orchestrate};
use crate::prompts;
use crate::vault::NoteSink;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Suffix appended to the PDF's stem to form the suggested note name.
pub const SUGGESTED_NAME_SUFFIX: &str = "_AI_formatted";

/// Convert a PDF into a cleaned-up Markdown draft using `tesseract`.
///
/// # Errors
/// - File not found / permission denied / not a PDF
/// - pdfium cannot be loaded, or the PDF cannot be opened
/// - the OCR command is missing, or any page fails to OCR
/// - the model did not answer
pub async fn convert(
    pdf: &str,
    app: &AppConfig,
    config: &ConversionConfig,
) -> Result<ConversionDraft, JesterError> {
    let recognizer = TesseractRecognizer::from_config(config);
    recognizer.check_available()?;
    let client = AiClient::new(app)?;

    convert_with(pdf, config, Arc::new(recognizer), &client).await
}

/// [`convert`] with an explicit recogniser and client.
pub async fn convert_with(
    pdf: &str,
    config: &ConversionConfig,
    recognizer: Arc<dyn TextRecognizer>,
    client: &AiClient,
) -> Result<ConversionDraft, JesterError> {
    let total_start = Instant::now();
    info!("Starting conversion: {}", pdf);

    // ── Step 1: Resolve input ────────────────────────────────────────────
    let pdf_path = input::resolve_pdf(pdf)?;

    // ── Step 2: Render and OCR ───────────────────────────────────────────
    let extraction = orchestrate::extract_document(&pdf_path, config, recognizer).await?;

    // ── Step 3: AI cleanup ───────────────────────────────────────────────
    if let Some(ref cb) = config.progress_callback {
        cb.on_cleanup_start(extraction.document.text_len());
    }
    let mut draft = clean_up(&extraction.document, &pdf_path, client).await?;

    draft.stats.render_duration_ms = extraction.render_duration_ms;
    draft.stats.ocr_duration_ms = extraction.ocr_duration_ms;
    draft.stats.total_duration_ms = total_start.elapsed().as_millis() as u64;

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_complete(draft.stats.total_pages);
    }

    info!(
        "Conversion complete: {} pages, {} OCR chars, {}ms total",
        draft.stats.total_pages, draft.stats.ocr_chars, draft.stats.total_duration_ms
    );

    Ok(draft)
}

/// Send the aggregate OCR text to the model once and wrap the answer.
///
/// A failed reply becomes [`JesterError::LlmApiError`]; it is never passed
/// on as if it were Markdown.
pub async fn clean_up(
    document: &AggregateDocument,
    source: &Path,
    client: &AiClient,
) -> Result<ConversionDraft, JesterError> {
    let ocr_text = document.markdown();
    let prompt = prompts::cleanup_prompt(&ocr_text);

    let llm_start = Instant::now();
    let markdown = client.ask(&prompt).await.into_result()?;
    let llm_duration_ms = llm_start.elapsed().as_millis() as u64;

    Ok(ConversionDraft {
        source: source.to_path_buf(),
        suggested_name: suggested_name(source),
        markdown: markdown.trim().to_string(),
        stats: ConversionStats {
            total_pages: document.page_count(),
            ocr_chars: ocr_text.trim().len(),
            llm_duration_ms,
            ..Default::default()
        },
    })
}

/// Write `draft` as `<dir>/<name>.md`.
pub async fn save_draft(
    draft: &ConversionDraft,
    dir: &Path,
    name: &str,
) -> Result<PathBuf, JesterError> {
    NoteSink::new(dir).save(name, &draft.markdown).await
}

/// `<pdf stem>_AI_formatted`.
pub fn suggested_name(source: &Path) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    format!("{stem}{SUGGESTED_NAME_SUFFIX}")
}
