//! Progress-callback trait for per-page conversion events.
//!
//! Inject an [`Arc<dyn EncodeProgress>`] via
//! [`crate::config::LabelConfigBuilder::progress`] to receive real-time
//! events as the pipeline encodes each page.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers
//! can forward events to a channel, a database record, or a terminal
//! progress bar without the library knowing anything about how the host
//! application communicates. The trait is `Send + Sync` so it works
//! correctly when the batch driver converts documents concurrently.

use std::sync::Arc;

/// Called by the conversion pipeline as it processes each page of a
/// document.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Implementations must protect shared mutable state
/// with appropriate synchronisation (the batch driver may run documents on
/// different threads).
pub trait EncodeProgress: Send + Sync {
    /// Called once per document, before any page is encoded.
    fn on_convert_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called just before a page is binarised and encoded.
    fn on_page_start(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called when a page was encoded; `zpl_len` is the byte length of the
    /// produced label text.
    fn on_page_complete(&self, page_num: usize, total_pages: usize, zpl_len: usize) {
        let _ = (page_num, total_pages, zpl_len);
    }

    /// Called when a page failed to render or encode.
    fn on_page_error(&self, page_num: usize, total_pages: usize, error: &str) {
        let _ = (page_num, total_pages, error);
    }

    /// Called once per document after all pages were attempted.
    fn on_convert_complete(&self, total_pages: usize, success_count: usize) {
        let _ = (total_pages, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgress;

impl EncodeProgress for NoopProgress {}

/// Convenience alias matching the type stored in [`crate::config::LabelConfig`].
pub type ProgressCallback = Arc<dyn EncodeProgress>;
