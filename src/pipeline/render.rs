//! PDF rasterisation: render selected pages to `DynamicImage` via pdfium.
//!
//! ## Why spawn_blocking?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which uses
//! thread-local state internally and is not safe to call from async
//! contexts. `tokio::task::spawn_blocking` moves the work onto a dedicated
//! thread pool thread designed for blocking operations, preventing the
//! Tokio worker threads from stalling during CPU-heavy rendering.
//!
//! ## Render size vs. label size
//!
//! Pages are rendered at roughly the target label width and then resized
//! exactly in the binarisation stage. pdfium preserves the page's aspect
//! ratio when rendering, while the label geometry is fixed by the physical
//! label stock, so an exact `resize_exact` at the end is the step that
//! decides the final raster dimensions.

use crate::config::LabelConfig;
use crate::error::Pdf2ZplError;
use crate::output::DocumentMetadata;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::{debug, info, warn};

/// One selected page: its 0-based index and the render outcome.
///
/// A failed render is carried as a per-page error so the caller can record
/// it in the page's result and keep converting the rest of the document.
pub type RenderedPage = (usize, Result<DynamicImage, Pdf2ZplError>);

/// Rasterise selected pages of a PDF into images.
///
/// This runs inside `spawn_blocking` since pdfium operations are CPU-bound.
///
/// # Errors
/// Fatal only when the document itself cannot be loaded (missing, corrupt,
/// wrong password). A page that fails to render yields an `Err` entry in
/// the returned vector instead.
pub async fn render_pages(
    pdf_path: &Path,
    config: &LabelConfig,
    page_indices: &[usize],
) -> Result<Vec<RenderedPage>, Pdf2ZplError> {
    let path = pdf_path.to_path_buf();
    let (target_width, _) = config.target_pixels()?;
    let password = config.password.clone();
    let indices = page_indices.to_vec();

    let result = tokio::task::spawn_blocking(move || {
        render_pages_blocking(&path, target_width, password.as_deref(), &indices)
    })
    .await
    .map_err(|e| Pdf2ZplError::Internal(format!("Render task panicked: {}", e)))?;

    result
}

/// Blocking implementation of page rendering.
fn render_pages_blocking(
    pdf_path: &Path,
    target_width: u32,
    password: Option<&str>,
    page_indices: &[usize],
) -> Result<Vec<RenderedPage>, Pdf2ZplError> {
    let pdfium = Pdfium::default();

    let document = pdfium
        .load_pdf_from_file(pdf_path, password)
        .map_err(|e| map_load_error(e, pdf_path, password))?;

    let pages = document.pages();
    let total_pages = pages.len() as usize;
    info!("PDF loaded: {} pages", total_pages);

    let render_config = PdfRenderConfig::new().set_target_width(target_width as i32);

    let mut results = Vec::with_capacity(page_indices.len());

    for &idx in page_indices {
        if idx >= total_pages {
            warn!(
                "Skipping page {} (out of range, total={})",
                idx + 1,
                total_pages
            );
            continue;
        }

        let rendered = pages
            .get(idx as u16)
            .and_then(|page| page.render_with_config(&render_config).map(|b| b.as_image()))
            .map_err(|e| Pdf2ZplError::RasterisationFailed {
                page: idx + 1,
                detail: format!("{:?}", e),
            });

        match &rendered {
            Ok(image) => debug!(
                "Rendered page {} → {}x{} px",
                idx + 1,
                image.width(),
                image.height()
            ),
            Err(e) => warn!("{}", e),
        }

        results.push((idx, rendered));
    }

    Ok(results)
}

fn map_load_error(e: PdfiumError, pdf_path: &Path, password: Option<&str>) -> Pdf2ZplError {
    let err_str = format!("{:?}", e);
    if err_str.contains("Password") || err_str.contains("password") {
        if password.is_some() {
            Pdf2ZplError::WrongPassword {
                path: pdf_path.to_path_buf(),
            }
        } else {
            Pdf2ZplError::PasswordRequired {
                path: pdf_path.to_path_buf(),
            }
        }
    } else {
        Pdf2ZplError::CorruptPdf {
            path: pdf_path.to_path_buf(),
            detail: err_str,
        }
    }
}

/// Extract document metadata from a PDF without rendering pages.
pub async fn extract_metadata(
    pdf_path: &Path,
    password: Option<&str>,
) -> Result<DocumentMetadata, Pdf2ZplError> {
    let path = pdf_path.to_path_buf();
    let pwd = password.map(|s| s.to_string());

    tokio::task::spawn_blocking(move || extract_metadata_blocking(&path, pwd.as_deref()))
        .await
        .map_err(|e| Pdf2ZplError::Internal(format!("Metadata task panicked: {}", e)))?
}

/// Blocking implementation of metadata extraction.
fn extract_metadata_blocking(
    pdf_path: &Path,
    password: Option<&str>,
) -> Result<DocumentMetadata, Pdf2ZplError> {
    let pdfium = Pdfium::default();

    let document = pdfium
        .load_pdf_from_file(pdf_path, password)
        .map_err(|e| map_load_error(e, pdf_path, password))?;

    let metadata = document.metadata();
    let pages = document.pages();

    let get_meta = |tag: PdfDocumentMetadataTagType| -> Option<String> {
        metadata.get(tag).and_then(|t| {
            let v = t.value().to_string();
            if v.is_empty() {
                None
            } else {
                Some(v)
            }
        })
    };

    Ok(DocumentMetadata {
        title: get_meta(PdfDocumentMetadataTagType::Title),
        author: get_meta(PdfDocumentMetadataTagType::Author),
        page_count: pages.len() as usize,
        pdf_version: format!("{:?}", document.version()),
    })
}
