//! PDF rasterisation: render every page to a `DynamicImage` via pdfium.
//!
//! ## Why spawn_blocking?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which keeps
//! process-global state and serialises every call behind one lock. Rendering
//! therefore runs as a single blocking task; fanning it out would only queue
//! threads on that lock. OCR is the expensive stage and is parallelised
//! separately.
//!
//! ## Library discovery
//!
//! `PDFIUM_LIB_PATH` wins when set. Otherwise the platform library name is
//! tried in the working directory, then the system loader path.

use crate::config::ConversionConfig;
use crate::error::JesterError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Points per inch in PDF user space.
const PDF_POINTS_PER_INCH: f32 = 72.0;

/// Environment variable naming an explicit pdfium shared library.
pub const PDFIUM_LIB_ENV: &str = "PDFIUM_LIB_PATH";

/// Rasterise all pages of a PDF, in page order.
///
/// # Returns
/// A vector of `(page_index_0based, DynamicImage)` tuples. Empty for a PDF
/// with no pages.
pub async fn render_pages(
    pdf_path: &Path,
    config: &ConversionConfig,
) -> Result<Vec<(usize, DynamicImage)>, JesterError> {
    let path = pdf_path.to_path_buf();
    let dpi = config.dpi;
    let max_pixels = config.max_rendered_pixels;
    let password = config.password.clone();

    tokio::task::spawn_blocking(move || {
        render_pages_blocking(&path, dpi, max_pixels, password.as_deref())
    })
    .await
    .map_err(|e| JesterError::Internal(format!("Render task panicked: {}", e)))?
}

/// Bind to the pdfium shared library.
pub fn bind_pdfium() -> Result<Pdfium, JesterError> {
    let bindings = match std::env::var_os(PDFIUM_LIB_ENV) {
        Some(path) => {
            let path = PathBuf::from(path);
            debug!("Binding pdfium from {}", path.display());
            Pdfium::bind_to_library(&path)
        }
        None => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library()),
    }
    .map_err(|e| JesterError::PdfiumBindingFailed(format!("{:?}", e)))?;

    Ok(Pdfium::new(bindings))
}

fn render_pages_blocking(
    pdf_path: &Path,
    dpi: u32,
    max_pixels: u32,
    password: Option<&str>,
) -> Result<Vec<(usize, DynamicImage)>, JesterError> {
    let pdfium = bind_pdfium()?;

    let document = pdfium
        .load_pdf_from_file(pdf_path, password)
        .map_err(|e| load_error(pdf_path, password.is_some(), format!("{:?}", e)))?;

    let pages = document.pages();
    let total_pages = pages.len() as usize;
    info!("PDF loaded: {} pages", total_pages);

    let render_config = PdfRenderConfig::new()
        .scale_page_by_factor(dpi as f32 / PDF_POINTS_PER_INCH)
        .set_maximum_width(max_pixels as i32)
        .set_maximum_height(max_pixels as i32);

    let mut results = Vec::with_capacity(total_pages);

    for (idx, page) in pages.iter().enumerate() {
        let bitmap = page.render_with_config(&render_config).map_err(|e| {
            JesterError::RasterisationFailed {
                page: idx + 1,
                detail: format!("{:?}", e),
            }
        })?;

        let image = bitmap.as_image();
        debug!(
            "Rendered page {} → {}x{} px",
            idx + 1,
            image.width(),
            image.height()
        );

        results.push((idx, image));
    }

    Ok(results)
}

/// Classify a pdfium load failure.
fn load_error(pdf_path: &Path, had_password: bool, detail: String) -> JesterError {
    let path = pdf_path.to_path_buf();
    if detail.to_ascii_lowercase().contains("password") {
        if had_password {
            JesterError::WrongPassword { path }
        } else {
            JesterError::PasswordRequired { path }
        }
    } else {
        JesterError::CorruptPdf { path, detail }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_errors_are_classified() {
        let p = Path::new("secret.pdf");
        let detail = "PdfiumLibraryInternalError(PasswordError)".to_string();

        assert!(matches!(
            load_error(p, false, detail.clone()),
            JesterError::PasswordRequired { .. }
        ));
        assert!(matches!(
            load_error(p, true, detail),
            JesterError::WrongPassword { .. }
        ));
    }

    #[test]
    fn other_load_errors_are_corrupt() {
        let err = load_error(
            Path::new("bad.pdf"),
            false,
            "PdfiumLibraryInternalError(FormatError)".into(),
        );
        match err {
            JesterError::CorruptPdf { detail, .. } => assert!(detail.contains("FormatError")),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
