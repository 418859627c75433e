//! Fan rendered pages out to OCR workers and collect them in page order.
//!
//! Each page runs in `spawn_blocking` (the recogniser is synchronous and
//! CPU-bound) and at most `ocr_workers` pages are in flight at once via
//! `buffer_unordered`. Pages finish in any order; [`AggregateDocument`]
//! sorts them back by index. The first failing page aborts the whole
//! document: no partial text is ever returned.

use crate::config::ConversionConfig;
use crate::error::{JesterError, PageError};
use crate::output::{AggregateDocument, PageText};
use crate::pipeline::ocr::{self, TextRecognizer};
use crate::pipeline::render;
use crate::progress::ProgressCallback;
use futures::stream::{self, StreamExt, TryStreamExt};
use image::DynamicImage;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// OCR text for a whole PDF plus how long each stage took.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub document: AggregateDocument,
    pub render_duration_ms: u64,
    pub ocr_duration_ms: u64,
}

/// Render every page of `pdf_path` and OCR it.
pub async fn extract_document(
    pdf_path: &Path,
    config: &ConversionConfig,
    recognizer: Arc<dyn TextRecognizer>,
) -> Result<Extraction, JesterError> {
    let render_start = Instant::now();
    let rendered = render::render_pages(pdf_path, config).await?;
    let render_duration_ms = render_start.elapsed().as_millis() as u64;
    info!(
        "Rendered {} pages in {}ms",
        rendered.len(),
        render_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_render_complete(rendered.len());
    }

    let ocr_start = Instant::now();
    let document = recognize_pages(
        rendered,
        recognizer,
        config.ocr_workers,
        config.progress_callback.clone(),
    )
    .await?;
    let ocr_duration_ms = ocr_start.elapsed().as_millis() as u64;
    info!(
        "Recognised {} pages ({} chars) in {}ms",
        document.page_count(),
        document.text_len(),
        ocr_duration_ms
    );

    Ok(Extraction {
        document,
        render_duration_ms,
        ocr_duration_ms,
    })
}

/// OCR `images` with at most `workers` pages in flight.
///
/// The result is ordered by page index whatever order the workers finish
/// in. Zero images give an empty document.
pub async fn recognize_pages(
    images: Vec<(usize, DynamicImage)>,
    recognizer: Arc<dyn TextRecognizer>,
    workers: usize,
    progress: Option<ProgressCallback>,
) -> Result<AggregateDocument, PageError> {
    let total_pages = images.len();

    let pages: Vec<PageText> = stream::iter(images.into_iter().map(|(idx, image)| {
        let recognizer = Arc::clone(&recognizer);
        let progress = progress.clone();
        async move {
            let page_num = idx + 1;
            if let Some(ref cb) = progress {
                cb.on_page_start(page_num, total_pages);
            }

            let result = tokio::task::spawn_blocking(move || {
                ocr::ocr_page(idx, image, recognizer.as_ref())
            })
            .await
            .unwrap_or_else(|e| {
                Err(PageError::WorkerPanicked {
                    page: page_num,
                    detail: e.to_string(),
                })
            });

            match &result {
                Ok(page) => {
                    if let Some(ref cb) = progress {
                        cb.on_page_complete(page_num, total_pages, page.text.len());
                    }
                }
                Err(e) => {
                    warn!("Page {} failed: {}", page_num, e);
                    if let Some(ref cb) = progress {
                        cb.on_page_error(page_num, total_pages, &e.to_string());
                    }
                }
            }
            result
        }
    }))
    .buffer_unordered(workers.max(1))
    .try_collect()
    .await?;

    Ok(AggregateDocument::from_pages(pages))
}
