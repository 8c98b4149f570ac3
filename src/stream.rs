//! Streaming conversion API: emit labels as they are encoded.
//!
//! Unlike the eager [`crate::convert::convert`] which returns only after
//! all pages finish, [`convert_stream`] yields `PageResult` items via a
//! `Stream` as each page is encoded, in page order. Callers can hand each
//! label to a printer spooler (or write it to disk) as soon as it exists.
//!
//! Rendering still happens up front: pdfium rasterises every selected page
//! before the stream is returned, so peak memory is the same as the eager
//! path. Only the binarise/encode stage is deferred to consumer polls.

use crate::config::LabelConfig;
use crate::error::{PageError, Pdf2ZplError};
use crate::output::PageResult;
use crate::pipeline::{binarize, input, render};
use crate::zpl;
use futures::stream;
use std::path::Path;
use std::pin::Pin;
use tokio_stream::Stream;
use tracing::info;

/// A boxed stream of page results.
pub type PageStream = Pin<Box<dyn Stream<Item = Result<PageResult, PageError>> + Send>>;

/// Convert a PDF to ZPL, streaming labels as they are ready.
///
/// Pages are emitted in page order. A page that fails to render, binarise,
/// or encode is emitted as `Err(PageError)`; the stream continues with the
/// next page.
///
/// # Returns
/// - `Ok(PageStream)` — a stream of `Result<PageResult, PageError>`
/// - `Err(Pdf2ZplError)` — fatal error (file not found, not a PDF, etc.)
pub async fn convert_stream(
    input_path: impl AsRef<Path>,
    config: &LabelConfig,
) -> Result<PageStream, Pdf2ZplError> {
    let input_path = input_path.as_ref();
    info!("Starting streaming conversion: {}", input_path.display());

    // ── Resolve input and geometry ───────────────────────────────────────
    let pdf_path = input::resolve_pdf(input_path)?;
    let target = config.target_pixels()?;

    // ── Extract metadata for page count ──────────────────────────────────
    let metadata = render::extract_metadata(&pdf_path, config.password.as_deref()).await?;
    let total_pages = metadata.page_count;

    // ── Compute page indices ─────────────────────────────────────────────
    let page_indices = config.pages.to_indices(total_pages);
    if page_indices.is_empty() {
        return Err(Pdf2ZplError::PageOutOfRange {
            page: config.pages.first_requested(),
            total: total_pages,
        });
    }

    // ── Render all pages ─────────────────────────────────────────────────
    let rendered = render::render_pages(&pdf_path, config, &page_indices).await?;

    // ── Build the stream ─────────────────────────────────────────────────
    // Encoding is pure and fast relative to rendering; each page is
    // binarised and encoded lazily as the consumer polls, so its image is
    // dropped as soon as its label exists.
    let threshold = config.threshold;
    let invert = config.invert;
    let s = stream::iter(rendered.into_iter().map(move |(idx, rendered_page)| {
        let page_num = idx + 1;
        let img = rendered_page.map_err(|e| PageError::RenderFailed {
            page: page_num,
            detail: e.to_string(),
        })?;
        binarize::binarize_page(&img, target, threshold, invert)
            .and_then(|raster| zpl::encode(&raster))
            .map(|label| PageResult::ok(page_num, label))
            .map_err(|e| PageError::EncodeFailed {
                page: page_num,
                detail: e.to_string(),
            })
    }));

    Ok(Box::pin(s))
}
