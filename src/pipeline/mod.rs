//! Pipeline stages for PDF-to-Markdown conversion.
//!
//! Each submodule implements one step, so each is testable on its own and a
//! stage (say, the OCR engine) can be swapped without touching the others.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ render ──▶ preprocess ──▶ ocr ──▶ orchestrate
//! (path)    (pdfium)   (threshold)    (tesseract)  (ordered collect)
//! ```
//!
//! 1. [`input`]: validate the user-supplied path as a readable PDF
//! 2. [`render`]: rasterise every page at the configured DPI; runs in
//!    `spawn_blocking` because pdfium is not async-safe
//! 3. [`preprocess`]: greyscale, binarise, sharpen
//! 4. [`ocr`]: the per-page worker and the recogniser seam
//! 5. [`orchestrate`]: fan pages out to a bounded worker pool and put the
//!    results back in page order

pub mod input;
pub mod ocr;
pub mod orchestrate;
pub mod preprocess;
pub mod render;
