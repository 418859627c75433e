//! Per-page OCR worker and the recogniser seam.
//!
//! ## Why an external process?
//!
//! Tesseract's in-process API keeps global state and is not safe to drive
//! from several threads at once. Running the `tesseract` executable once per
//! page gives every page its own address space: workers share nothing but
//! the image they were handed and the text they hand back, and a crash in
//! the engine takes down one page rather than the whole program.
//!
//! `OMP_THREAD_LIMIT=1` stops each process from spinning up its own OpenMP
//! pool; the parallelism comes from running several pages at once instead.

use crate::config::ConversionConfig;
use crate::error::{JesterError, PageError};
use crate::output::PageText;
use crate::pipeline::preprocess;
use image::{DynamicImage, GrayImage, ImageFormat};
use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

/// Tesseract engine mode: default (LSTM when available).
const OCR_ENGINE_MODE: &str = "3";

/// Tesseract page segmentation mode: a single uniform block of text.
const PAGE_SEG_MODE: &str = "6";

/// Turns a preprocessed page image into text.
///
/// Called from blocking worker threads, possibly several at once, so
/// implementations must be `Send + Sync` and must not rely on being called
/// in page order.
pub trait TextRecognizer: Send + Sync {
    /// Recognise the text on page `page_num` (1-indexed).
    fn recognize(&self, page_num: usize, image: &GrayImage) -> Result<String, PageError>;
}

/// Recogniser backed by the `tesseract` command-line tool.
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    command: PathBuf,
    language: String,
}

impl TesseractRecognizer {
    pub fn new(command: impl Into<PathBuf>, language: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            language: language.into(),
        }
    }

    pub fn from_config(config: &ConversionConfig) -> Self {
        Self::new(&config.tesseract_cmd, &config.ocr_language)
    }

    /// Run `tesseract --version` to confirm the executable can be started.
    pub fn check_available(&self) -> Result<(), JesterError> {
        let unavailable = |detail: String| JesterError::OcrUnavailable {
            command: self.command.display().to_string(),
            detail,
        };

        let output = Command::new(&self.command)
            .arg("--version")
            .output()
            .map_err(|e| unavailable(e.to_string()))?;

        if !output.status.success() {
            return Err(unavailable(format!("exited with {}", output.status)));
        }

        let version = String::from_utf8_lossy(&output.stdout);
        debug!(
            "OCR engine: {}",
            version.lines().next().unwrap_or("unknown version")
        );
        Ok(())
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn recognize(&self, page_num: usize, image: &GrayImage) -> Result<String, PageError> {
        let failed = |detail: String| PageError::OcrFailed {
            page: page_num,
            detail,
        };

        let file = tempfile::Builder::new()
            .prefix("jester-page-")
            .suffix(".png")
            .tempfile()
            .map_err(|e| failed(format!("temp file: {e}")))?;

        image
            .save_with_format(file.path(), ImageFormat::Png)
            .map_err(|e| failed(format!("encode page image: {e}")))?;

        let output = Command::new(&self.command)
            .arg(file.path())
            .arg("stdout")
            .args(["-l", self.language.as_str()])
            .args(["--oem", OCR_ENGINE_MODE, "--psm", PAGE_SEG_MODE])
            .env("OMP_THREAD_LIMIT", "1")
            .output()
            .map_err(|e| failed(format!("could not start {}: {e}", self.command.display())))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(failed(format!(
                "{} exited with {}: {}",
                self.command.display(),
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// OCR one page: preprocess, recognise, tag with its index.
///
/// Takes the image by value; the raster is dropped as soon as the
/// preprocessed copy exists.
pub fn ocr_page(
    index: usize,
    image: DynamicImage,
    recognizer: &dyn TextRecognizer,
) -> Result<PageText, PageError> {
    let page_num = index + 1;
    debug!("Page {}: starting OCR", page_num);

    let prepared = preprocess::prepare_for_ocr(&image);
    drop(image);

    let text = recognizer.recognize(page_num, &prepared)?;
    debug!("Page {}: finished OCR ({} chars)", page_num, text.len());

    Ok(PageText::new(index, text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records what it was given and answers with a fixed string.
    struct Recording {
        seen: Mutex<Vec<(usize, (u32, u32), bool)>>,
    }

    impl TextRecognizer for Recording {
        fn recognize(&self, page_num: usize, image: &GrayImage) -> Result<String, PageError> {
            let binary = image.pixels().all(|p| p[0] == 0 || p[0] == 255);
            self.seen
                .lock()
                .unwrap()
                .push((page_num, image.dimensions(), binary));
            Ok("hello".into())
        }
    }

    struct Failing;

    impl TextRecognizer for Failing {
        fn recognize(&self, page_num: usize, _image: &GrayImage) -> Result<String, PageError> {
            Err(PageError::OcrFailed {
                page: page_num,
                detail: "engine crashed".into(),
            })
        }
    }

    #[test]
    fn worker_preprocesses_and_tags() {
        let rec = Recording {
            seen: Mutex::new(Vec::new()),
        };
        let page = ocr_page(2, DynamicImage::new_rgb8(8, 6), &rec).unwrap();

        assert_eq!(page, PageText::new(2, "hello"));
        assert!(page.section().contains("## Page 3\nhello"));
        assert_eq!(rec.seen.lock().unwrap().as_slice(), &[(3, (8, 6), true)]);
    }

    #[test]
    fn worker_propagates_failure() {
        let err = ocr_page(0, DynamicImage::new_luma8(2, 2), &Failing).unwrap_err();
        assert_eq!(err.page(), 1);
    }

    #[test]
    fn missing_tesseract_is_unavailable() {
        let rec = TesseractRecognizer::new("/nonexistent/tesseract-binary", "eng");
        let err = rec.check_available().unwrap_err();
        assert!(matches!(err, JesterError::OcrUnavailable { .. }));
    }

    #[test]
    fn missing_tesseract_fails_the_page() {
        let rec = TesseractRecognizer::new("/nonexistent/tesseract-binary", "eng");
        let err = rec
            .recognize(7, &GrayImage::new(4, 4))
            .unwrap_err();
        assert!(matches!(err, PageError::OcrFailed { page: 7, .. }));
    }
}
