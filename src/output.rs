//! Output types: per-page results, document metadata, and run statistics.
//!
//! Everything here derives `Serialize` so the CLI's `--json` mode and any
//! host application can persist a full conversion report without extra
//! mapping code.

use crate::error::PageError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The outcome of encoding one page.
///
/// Either `zpl` holds the complete label text and `error` is `None`, or
/// `zpl` is empty and `error` describes the failure. Failed pages are kept
/// in the document output so callers can see exactly which pages are
/// missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResult {
    /// 1-indexed page number within the document.
    pub page_num: usize,
    /// The complete `^XA…^XZ` label text for this page.
    pub zpl: String,
    /// Set when the page failed to render or encode.
    pub error: Option<PageError>,
    /// Where this page was written, when file output was requested.
    pub output_path: Option<PathBuf>,
}

impl PageResult {
    /// A successful page.
    pub fn ok(page_num: usize, zpl: String) -> Self {
        Self {
            page_num,
            zpl,
            error: None,
            output_path: None,
        }
    }

    /// A failed page.
    pub fn failed(page_num: usize, error: PageError) -> Self {
        Self {
            page_num,
            zpl: String::new(),
            error: Some(error),
            output_path: None,
        }
    }
}

/// Document properties read from the PDF without rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Document title, when the PDF carries one.
    pub title: Option<String>,
    /// Document author, when the PDF carries one.
    pub author: Option<String>,
    /// Total pages in the document.
    pub page_count: usize,
    /// PDF specification version as reported by pdfium.
    pub pdf_version: String,
}

/// Statistics for one document conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Total pages in the document.
    pub total_pages: usize,
    /// Pages encoded successfully.
    pub processed_pages: usize,
    /// Pages that failed to render or encode.
    pub failed_pages: usize,
    /// Selected pages that were never attempted (out of range).
    pub skipped_pages: usize,
    /// Total bytes of ZPL text produced.
    pub zpl_bytes: u64,
    /// Wall-clock time for the whole conversion.
    pub total_duration_ms: u64,
    /// Time spent inside pdfium rendering.
    pub render_duration_ms: u64,
    /// Time spent binarising and encoding.
    pub encode_duration_ms: u64,
}

/// The full result of converting one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// One entry per selected page, in page order, failures included.
    pub pages: Vec<PageResult>,
    /// Metadata read from the source PDF.
    pub metadata: DocumentMetadata,
    /// Timing and page accounting.
    pub stats: ConversionStats,
}

impl ConversionOutput {
    /// The successful pages, in page order.
    pub fn successful_pages(&self) -> impl Iterator<Item = &PageResult> {
        self.pages.iter().filter(|p| p.error.is_none())
    }
}
