//! Eager (full-document) conversion entry points.
//!
//! This module provides the simpler API: render all selected pages, encode
//! each one, then return everything. It collects every [`PageResult`] into
//! memory before returning. Use [`crate::stream::convert_stream`] instead
//! when you want each page's label as soon as it is encoded rather than
//! after the whole document finishes.
//!
//! A page failure is recorded in its [`PageResult`] and never aborts the
//! document; only a document where *every* selected page failed returns an
//! error ([`Pdf2ZplError::AllPagesFailed`]). Per-document isolation of
//! those errors is the batch driver's job (see [`crate::batch`]).

use crate::config::LabelConfig;
use crate::error::{PageError, Pdf2ZplError};
use crate::output::{ConversionOutput, ConversionStats, DocumentMetadata, PageResult};
use crate::pipeline::{binarize, input, render};
use crate::zpl;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Convert a PDF file to one ZPL label per selected page.
///
/// This is the primary entry point for the library.
///
/// # Returns
/// `Ok(ConversionOutput)` on success, even if some pages failed
/// (check `output.stats.failed_pages`).
///
/// # Errors
/// Returns `Err(Pdf2ZplError)` only for fatal errors:
/// - File not found / permission denied / not a PDF
/// - Invalid label configuration
/// - No selected page in range, or all selected pages failed
pub async fn convert(
    input_path: impl AsRef<Path>,
    config: &LabelConfig,
) -> Result<ConversionOutput, Pdf2ZplError> {
    let total_start = Instant::now();
    let input_path = input_path.as_ref();
    info!("Starting conversion: {}", input_path.display());

    // ── Step 1: Resolve input ────────────────────────────────────────────
    let pdf_path = input::resolve_pdf(input_path)?;

    // ── Step 2: Label geometry ───────────────────────────────────────────
    let target = config.target_pixels()?;

    // ── Step 3: Extract metadata ─────────────────────────────────────────
    let metadata = render::extract_metadata(&pdf_path, config.password.as_deref()).await?;
    let total_pages = metadata.page_count;
    info!("PDF has {} pages", total_pages);

    // ── Step 4: Compute page indices ─────────────────────────────────────
    let page_indices = config.pages.to_indices(total_pages);
    if page_indices.is_empty() {
        return Err(Pdf2ZplError::PageOutOfRange {
            page: config.pages.first_requested(),
            total: total_pages,
        });
    }
    debug!("Selected {} pages for conversion", page_indices.len());

    if let Some(ref cb) = config.progress {
        cb.on_convert_start(page_indices.len());
    }

    // ── Step 5: Rasterise pages ──────────────────────────────────────────
    let render_start = Instant::now();
    let rendered = render::render_pages(&pdf_path, config, &page_indices).await?;
    let render_duration_ms = render_start.elapsed().as_millis() as u64;
    info!(
        "Rendered {} pages in {}ms",
        rendered.len(),
        render_duration_ms
    );

    // ── Step 6: Binarise + encode each page ──────────────────────────────
    let encode_start = Instant::now();
    let selected = page_indices.len();
    let mut pages: Vec<PageResult> = Vec::with_capacity(rendered.len());
    for (idx, rendered_page) in rendered {
        let page_num = idx + 1;
        if let Some(ref cb) = config.progress {
            cb.on_page_start(page_num, selected);
        }
        let page = encode_page(
            page_num,
            rendered_page,
            target,
            config.threshold,
            config.invert,
        );
        if let Some(ref cb) = config.progress {
            match &page.error {
                None => cb.on_page_complete(page_num, selected, page.zpl.len()),
                Some(e) => cb.on_page_error(page_num, selected, &e.to_string()),
            }
        }
        pages.push(page);
    }
    let encode_duration_ms = encode_start.elapsed().as_millis() as u64;

    // Stable page order for deterministic output naming.
    pages.sort_by_key(|p| p.page_num);

    // ── Step 7: Compute stats ────────────────────────────────────────────
    let processed = pages.iter().filter(|p| p.error.is_none()).count();
    let failed = pages.iter().filter(|p| p.error.is_some()).count();
    let skipped = selected.saturating_sub(pages.len());

    if processed == 0 {
        let first_error = pages
            .iter()
            .find_map(|p| p.error.as_ref())
            .map(|e| e.to_string())
            .unwrap_or_else(|| "Unknown error".to_string());

        return Err(Pdf2ZplError::AllPagesFailed {
            total: pages.len(),
            first_error,
        });
    }

    let stats = ConversionStats {
        total_pages,
        processed_pages: processed,
        failed_pages: failed,
        skipped_pages: skipped,
        zpl_bytes: pages.iter().map(|p| p.zpl.len() as u64).sum(),
        total_duration_ms: total_start.elapsed().as_millis() as u64,
        render_duration_ms,
        encode_duration_ms,
    };

    info!(
        "Conversion complete: {}/{} pages, {}ms total",
        processed, selected, stats.total_duration_ms
    );

    if let Some(ref cb) = config.progress {
        cb.on_convert_complete(selected, processed);
    }

    Ok(ConversionOutput {
        pages,
        metadata,
        stats,
    })
}

/// Binarise and encode one rendered page, folding any failure into the
/// page's result.
///
/// A render failure arriving from the rasterisation stage becomes
/// [`PageError::RenderFailed`]; a binarisation or encoding failure becomes
/// [`PageError::EncodeFailed`]. Neither aborts the document.
fn encode_page(
    page_num: usize,
    rendered: Result<image::DynamicImage, Pdf2ZplError>,
    target: (u32, u32),
    threshold: u8,
    invert: bool,
) -> PageResult {
    let result = rendered
        .map_err(|e| PageError::RenderFailed {
            page: page_num,
            detail: e.to_string(),
        })
        .and_then(|img| {
            binarize::binarize_page(&img, target, threshold, invert)
                .and_then(|raster| zpl::encode(&raster))
                .map_err(|e| PageError::EncodeFailed {
                    page: page_num,
                    detail: e.to_string(),
                })
        });
    match result {
        Ok(label) => PageResult::ok(page_num, label),
        Err(e) => PageResult::failed(page_num, e),
    }
}

/// Convert a PDF and write one `.zpl` file per page into `output_dir`.
///
/// Naming follows the document's page count: a single-page document writes
/// `<base>.zpl`; a multi-page document writes `<base>_p<N>.zpl` with the
/// 1-based page number, so parallel batch runs never collide on a path.
/// Uses atomic writes (temp file + rename) to prevent partial files.
pub async fn convert_to_files(
    input_path: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    config: &LabelConfig,
) -> Result<ConversionOutput, Pdf2ZplError> {
    let input_path = input_path.as_ref();
    let output_dir = output_dir.as_ref();

    let mut output = convert(input_path, config).await?;

    tokio::fs::create_dir_all(output_dir)
        .await
        .map_err(|e| Pdf2ZplError::OutputWriteFailed {
            path: output_dir.to_path_buf(),
            source: e,
        })?;

    let multi_page = output.metadata.page_count > 1;
    for page in output.pages.iter_mut().filter(|p| p.error.is_none()) {
        let path = page_output_path(output_dir, input_path, page.page_num, multi_page);
        write_atomic(&path, page.zpl.as_bytes()).await?;
        debug!("Wrote page {} to {}", page.page_num, path.display());
        page.output_path = Some(path);
    }

    Ok(output)
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    input_path: impl AsRef<Path>,
    config: &LabelConfig,
) -> Result<ConversionOutput, Pdf2ZplError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Pdf2ZplError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert(input_path, config))
}

/// Extract PDF metadata without converting content.
pub async fn inspect(input_path: impl AsRef<Path>) -> Result<DocumentMetadata, Pdf2ZplError> {
    let pdf_path = input::resolve_pdf(input_path)?;
    render::extract_metadata(&pdf_path, None).await
}

/// Convert PDF bytes in memory to ZPL labels.
///
/// pdfium needs a file-system path, so the bytes are written to a managed
/// [`tempfile`] that is cleaned up automatically on return or panic. This is
/// the recommended API when PDF data comes from a database, network stream,
/// or in-memory buffer rather than a file on disk.
pub async fn convert_from_bytes(
    bytes: &[u8],
    config: &LabelConfig,
) -> Result<ConversionOutput, Pdf2ZplError> {
    use std::io::Write as _;

    let mut tmp = tempfile::Builder::new()
        .suffix(".pdf")
        .tempfile()
        .map_err(|e| Pdf2ZplError::Internal(format!("tempfile: {e}")))?;
    tmp.write_all(bytes)
        .map_err(|e| Pdf2ZplError::Internal(format!("tempfile write: {e}")))?;
    let path = tmp.path().to_path_buf();
    // `tmp` is dropped (and the file deleted) when `convert` returns
    convert(&path, config).await
}

/// The output path for one page of a document.
///
/// `<base>.zpl` for single-page documents; `<base>_p<N>.zpl` (1-based) for
/// multi-page documents.
pub fn page_output_path(
    output_dir: &Path,
    pdf_path: &Path,
    page_num: usize,
    multi_page: bool,
) -> PathBuf {
    let base = pdf_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("label");
    let name = if multi_page {
        format!("{base}_p{page_num}.zpl")
    } else {
        format!("{base}.zpl")
    };
    output_dir.join(name)
}

/// Atomic write: write to a sibling temp path, then rename into place.
async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), Pdf2ZplError> {
    let tmp_path = path.with_extension("zpl.tmp");
    tokio::fs::write(&tmp_path, bytes)
        .await
        .map_err(|e| Pdf2ZplError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| Pdf2ZplError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_page_naming() {
        let p = page_output_path(Path::new("out"), Path::new("in/invoice.pdf"), 1, false);
        assert_eq!(p, Path::new("out/invoice.zpl"));
    }

    #[test]
    fn multi_page_naming_uses_1_based_suffix() {
        let p = page_output_path(Path::new("out"), Path::new("in/manual.pdf"), 3, true);
        assert_eq!(p, Path::new("out/manual_p3.zpl"));
    }

    #[test]
    fn naming_survives_odd_stems() {
        let p = page_output_path(Path::new("out"), Path::new("in/a.b.c.pdf"), 2, true);
        assert_eq!(p, Path::new("out/a.b.c_p2.zpl"));
    }

    #[test]
    fn render_failure_becomes_a_failed_page_result() {
        let rendered = Err(Pdf2ZplError::RasterisationFailed {
            page: 3,
            detail: "bitmap allocation failed".into(),
        });
        let page = encode_page(3, rendered, (16, 16), 128, false);
        assert_eq!(page.page_num, 3);
        assert!(page.zpl.is_empty());
        match page.error {
            Some(PageError::RenderFailed { page: 3, ref detail }) => {
                assert!(detail.contains("bitmap allocation failed"));
            }
            other => panic!("expected RenderFailed, got {:?}", other),
        }
    }

    #[test]
    fn rendered_page_encodes_to_a_label() {
        let img = image::DynamicImage::new_luma8(16, 16);
        let page = encode_page(1, Ok(img), (16, 16), 128, false);
        assert!(page.error.is_none());
        assert!(page.zpl.starts_with("^XA"));
    }

    #[test]
    fn out_of_range_selection_names_the_requested_page() {
        use crate::config::PageSelection;
        let err = Pdf2ZplError::PageOutOfRange {
            page: PageSelection::Single(99).first_requested(),
            total: 5,
        };
        assert_eq!(
            err.to_string(),
            "Page 99 is out of range (document has 5 pages)"
        );
    }

    #[tokio::test]
    async fn convert_rejects_missing_file() {
        let config = LabelConfig::default();
        let err = convert("/no/such/file.pdf", &config).await.unwrap_err();
        assert!(matches!(err, Pdf2ZplError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn convert_from_bytes_rejects_non_pdf() {
        let config = LabelConfig::default();
        let err = convert_from_bytes(b"these are not PDF bytes", &config)
            .await
            .unwrap_err();
        assert!(matches!(err, Pdf2ZplError::NotAPdf { .. }));
    }

    #[tokio::test]
    async fn convert_rejects_non_pdf() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("junk.pdf");
        std::fs::write(&path, b"not a pdf at all").unwrap();
        let config = LabelConfig::default();
        let err = convert(&path, &config).await.unwrap_err();
        assert!(matches!(err, Pdf2ZplError::NotAPdf { .. }));
    }
}
