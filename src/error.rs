//! Error types for the pdf2zpl library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`Pdf2ZplError`] — **Fatal**: the conversion of a document cannot
//!   proceed at all (bad input file, bad configuration, wrong password).
//!   Returned as `Err(Pdf2ZplError)` from the top-level `convert*` functions.
//!
//! * [`PageError`] — **Non-fatal**: a single page failed (render glitch,
//!   contract violation upstream) but all other pages are fine. Stored inside
//!   [`crate::output::PageResult`] so callers can inspect partial success
//!   rather than losing the whole document to one bad page.
//!
//! The separation lets callers decide their own tolerance: abort on the first
//! page failure, log and continue, or collect all errors for a post-run
//! report. The batch driver additionally isolates whole-document failures so
//! one bad PDF never stops the run.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf2zpl library.
///
/// Page-level failures use [`PageError`] and are stored in
/// [`crate::output::PageResult`] rather than propagated here.
#[derive(Debug, Error)]
pub enum Pdf2ZplError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    /// The batch input directory does not exist or cannot be listed.
    #[error("Input directory not found or unreadable: '{path}'")]
    InputDirNotFound { path: PathBuf },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}\nTry repairing with: qpdf --decrypt input.pdf output.pdf")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// Selected page numbers exceed the actual page count.
    #[error("Page {page} is out of range (document has {total} pages)")]
    PageOutOfRange { page: usize, total: usize },

    /// pdfium-render returned an error for a specific page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    // ── Encoder contract ──────────────────────────────────────────────────
    /// A raster with a zero dimension reached the encoder.
    ///
    /// This indicates an upstream rasterisation failure; the encoder fails
    /// fast rather than emitting a `^GFA` field with a zero byte count that a
    /// printer would misparse.
    #[error("Cannot encode an empty raster ({width}x{height}); the rasteriser produced no pixels")]
    EmptyRaster { width: u32, height: u32 },

    /// Every selected page failed; no ZPL was produced for the document.
    #[error("All {total} pages failed during conversion.\nFirst error: {first_error}")]
    AllPagesFailed { total: usize, first_error: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write an output ZPL file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder or unit-conversion validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single page.
///
/// Stored alongside [`crate::output::PageResult`] when a page fails.
/// The overall conversion continues unless ALL pages fail.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum PageError {
    /// Page rasterisation failed.
    #[error("Page {page}: rasterisation failed: {detail}")]
    RenderFailed { page: usize, detail: String },

    /// Binarisation or ZPL encoding failed.
    #[error("Page {page}: encoding failed: {detail}")]
    EncodeFailed { page: usize, detail: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_raster_display() {
        let e = Pdf2ZplError::EmptyRaster {
            width: 0,
            height: 42,
        };
        let msg = e.to_string();
        assert!(msg.contains("0x42"), "got: {msg}");
    }

    #[test]
    fn all_pages_failed_display() {
        let e = Pdf2ZplError::AllPagesFailed {
            total: 3,
            first_error: "boom".into(),
        };
        assert!(e.to_string().contains("All 3 pages"));
        assert!(e.to_string().contains("boom"));
    }

    #[test]
    fn page_error_display() {
        let e = PageError::EncodeFailed {
            page: 2,
            detail: "empty raster".into(),
        };
        assert!(e.to_string().contains("Page 2"));
    }

    #[test]
    fn invalid_config_display() {
        let e = Pdf2ZplError::InvalidConfig("DPI must be >= 1, got 0".into());
        assert!(e.to_string().contains("DPI"));
    }
}
