//! Progress-callback trait for conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events as the pipeline rasterises, recognises and cleans up a document.
//!
//! # Example
//!
//! ```rust
//! use jester::{ConversionConfig, ConversionProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     recognised: AtomicUsize,
//! }
//!
//! impl ConversionProgressCallback for CountingCallback {
//!     fn on_page_complete(&self, page_num: usize, total_pages: usize, text_len: usize) {
//!         let done = self.recognised.fetch_add(1, Ordering::SeqCst) + 1;
//!         eprintln!("{done}: page {page_num}/{total_pages} ({text_len} chars)");
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { recognised: AtomicUsize::new(0) });
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(counter as Arc<dyn ConversionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the conversion pipeline as it processes a document.
///
/// All methods default to no-ops so callers only override what they need.
///
/// # Thread safety
///
/// `on_page_start`, `on_page_complete` and `on_page_error` are called from
/// concurrently running OCR workers, in completion order. Implementations
/// must protect shared mutable state (`Mutex`, atomics).
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once after rasterisation, before any page is recognised.
    fn on_render_complete(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called when an OCR worker picks up a page (1-indexed).
    fn on_page_start(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called when a page has been recognised.
    ///
    /// `text_len` is the byte length of the recognised text.
    fn on_page_complete(&self, page_num: usize, total_pages: usize, text_len: usize) {
        let _ = (page_num, total_pages, text_len);
    }

    /// Called when a page fails. The conversion aborts after this.
    fn on_page_error(&self, page_num: usize, total_pages: usize, error: &str) {
        let _ = (page_num, total_pages, error);
    }

    /// Called just before the aggregate document is sent for AI cleanup.
    fn on_cleanup_start(&self, document_len: usize) {
        let _ = document_len;
    }

    /// Called once the AI answered successfully.
    fn on_conversion_complete(&self, total_pages: usize) {
        let _ = total_pages;
    }
}

/// No-op implementation; the default when no callback is configured.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;
