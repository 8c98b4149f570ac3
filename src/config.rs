//! Configuration types for PDF-to-ZPL conversion.
//!
//! All conversion behaviour is controlled through [`LabelConfig`], built via
//! its [`LabelConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share configs across threads, serialise them for logging, and
//! diff two runs to understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! A ten-field constructor is unreadable and breaks on every new field.
//! The builder pattern lets callers set only what they care about and rely on
//! well-documented defaults for the rest.

use crate::error::Pdf2ZplError;
use crate::progress::ProgressCallback;
use crate::units;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration for a PDF-to-ZPL conversion.
///
/// Built via [`LabelConfig::builder()`] or using [`LabelConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf2zpl::LabelConfig;
///
/// let config = LabelConfig::builder()
///     .dpi(300)
///     .label_size_cm(10.0, 15.0)
///     .threshold(100)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct LabelConfig {
    /// Physical label width in centimetres. Default: 10.0.
    pub width_cm: f64,

    /// Physical label height in centimetres. Default: 15.0.
    pub height_cm: f64,

    /// Printer resolution in dots per inch. Default: 203.
    ///
    /// 203 DPI is the most common thermal label printhead density; 300 DPI
    /// heads exist on higher-end models. The raster handed to the encoder is
    /// sized from this value and the physical dimensions, so a mismatch with
    /// the actual printer prints the label at the wrong physical size.
    pub dpi: u32,

    /// Luma cut-off below which a pixel is DARK. Default: 128.
    ///
    /// Rendered text and line art are near-black on near-white, so the
    /// midpoint works for almost every document. Raise it to catch light
    /// grays (anti-aliased edges, pale scans); lower it to drop background
    /// tint picked up by a scanner.
    pub threshold: u8,

    /// Flip DARK/LIGHT polarity. Default: false.
    ///
    /// For sources whose rasteriser encodes black as high luma. An
    /// undetected mismatch silently prints a photographic negative, so this
    /// is an explicit switch rather than an auto-detection heuristic.
    pub invert: bool,

    /// Page selection. Default: all pages.
    pub pages: PageSelection,

    /// Number of documents converted concurrently in batch mode. Default: 4.
    ///
    /// Rendering is CPU-bound in pdfium and runs on the blocking thread
    /// pool; a small fan-out keeps all cores busy without oversubscribing
    /// memory on image-heavy documents.
    pub concurrency: usize,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Optional per-page progress callback.
    pub progress: Option<ProgressCallback>,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            width_cm: 10.0,
            height_cm: 15.0,
            dpi: 203,
            threshold: 128,
            invert: false,
            pages: PageSelection::default(),
            concurrency: 4,
            password: None,
            progress: None,
        }
    }
}

impl fmt::Debug for LabelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LabelConfig")
            .field("width_cm", &self.width_cm)
            .field("height_cm", &self.height_cm)
            .field("dpi", &self.dpi)
            .field("threshold", &self.threshold)
            .field("invert", &self.invert)
            .field("pages", &self.pages)
            .field("concurrency", &self.concurrency)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("progress", &self.progress.as_ref().map(|_| "<dyn EncodeProgress>"))
            .finish()
    }
}

impl LabelConfig {
    /// Create a new builder for `LabelConfig`.
    pub fn builder() -> LabelConfigBuilder {
        LabelConfigBuilder {
            config: Self::default(),
        }
    }

    /// Target raster dimensions in pixels for this label, truncated.
    ///
    /// Every page of a document is resized to exactly these dimensions
    /// before binarisation, so the encoder sees the same geometry for every
    /// page.
    pub fn target_pixels(&self) -> Result<(u32, u32), Pdf2ZplError> {
        units::to_pixel_dimensions(self.width_cm, self.height_cm, self.dpi)
    }
}

/// Builder for [`LabelConfig`].
#[derive(Debug)]
pub struct LabelConfigBuilder {
    config: LabelConfig,
}

impl LabelConfigBuilder {
    /// Physical label size in centimetres (width, height).
    pub fn label_size_cm(mut self, width_cm: f64, height_cm: f64) -> Self {
        self.config.width_cm = width_cm;
        self.config.height_cm = height_cm;
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi;
        self
    }

    pub fn threshold(mut self, threshold: u8) -> Self {
        self.config.threshold = threshold;
        self
    }

    pub fn invert(mut self, invert: bool) -> Self {
        self.config.invert = invert;
        self
    }

    pub fn pages(mut self, selection: PageSelection) -> Self {
        self.config.pages = selection;
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n.max(1);
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn progress(mut self, cb: ProgressCallback) -> Self {
        self.config.progress = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    ///
    /// Degenerate physical dimensions or DPI are rejected here, once per
    /// document, rather than clamped — a silently shrunken label is worse
    /// than a refused one.
    pub fn build(self) -> Result<LabelConfig, Pdf2ZplError> {
        // Validates dimensions, DPI, and that the result is at least 1x1 px.
        self.config.target_pixels()?;
        if self.config.concurrency == 0 {
            return Err(Pdf2ZplError::InvalidConfig("Concurrency must be >= 1".into()));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Specifies which pages of the PDF to convert.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum PageSelection {
    /// Convert all pages (default).
    #[default]
    All,
    /// Convert a single page (1-indexed).
    Single(usize),
    /// Convert a contiguous range of pages (1-indexed, inclusive).
    Range(usize, usize),
    /// Convert specific pages (1-indexed, deduplicated).
    Set(Vec<usize>),
}

impl PageSelection {
    /// Expand the selection into a sorted, deduplicated list of 0-indexed page numbers.
    pub fn to_indices(&self, total_pages: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = match self {
            PageSelection::All => (0..total_pages).collect(),
            PageSelection::Single(p) => {
                if *p >= 1 && *p <= total_pages {
                    vec![p - 1]
                } else {
                    vec![]
                }
            }
            PageSelection::Range(start, end) => {
                let s = (*start).max(1) - 1;
                let e = (*end).min(total_pages);
                (s..e).collect()
            }
            PageSelection::Set(pages) => pages
                .iter()
                .filter(|&&p| p >= 1 && p <= total_pages)
                .map(|p| p - 1)
                .collect(),
        };
        indices.sort_unstable();
        indices.dedup();
        indices
    }

    /// The lowest 1-indexed page this selection asks for.
    ///
    /// Used in error reporting when the selection matches no page of the
    /// document, so the message names a page the caller actually requested.
    pub fn first_requested(&self) -> usize {
        match self {
            PageSelection::All => 1,
            PageSelection::Single(p) => *p,
            PageSelection::Range(start, _) => (*start).max(1),
            PageSelection::Set(pages) => pages.iter().copied().min().unwrap_or(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let c = LabelConfig::default();
        assert_eq!(c.width_cm, 10.0);
        assert_eq!(c.height_cm, 15.0);
        assert_eq!(c.dpi, 203);
        assert_eq!(c.threshold, 128);
        assert!(!c.invert);
        assert_eq!(c.concurrency, 4);
    }

    #[test]
    fn default_config_target_pixels() {
        let c = LabelConfig::default();
        assert_eq!(c.target_pixels().unwrap(), (799, 1198));
    }

    #[test]
    fn builder_rejects_zero_dpi() {
        assert!(LabelConfig::builder().dpi(0).build().is_err());
    }

    #[test]
    fn builder_rejects_negative_label_size() {
        assert!(LabelConfig::builder()
            .label_size_cm(-10.0, 15.0)
            .build()
            .is_err());
    }

    #[test]
    fn builder_clamps_concurrency_floor() {
        let c = LabelConfig::builder().concurrency(0).build().unwrap();
        assert_eq!(c.concurrency, 1);
    }

    #[test]
    fn page_selection_to_indices() {
        assert_eq!(PageSelection::All.to_indices(5), vec![0, 1, 2, 3, 4]);
        assert_eq!(PageSelection::Single(3).to_indices(5), vec![2]);
        assert_eq!(PageSelection::Single(6).to_indices(5), Vec::<usize>::new());
        assert_eq!(PageSelection::Range(2, 4).to_indices(5), vec![1, 2, 3]);
        assert_eq!(
            PageSelection::Set(vec![3, 1, 3]).to_indices(5),
            vec![0, 2] // deduplicated and sorted
        );
    }

    #[test]
    fn first_requested_names_the_lowest_page() {
        assert_eq!(PageSelection::All.first_requested(), 1);
        assert_eq!(PageSelection::Single(99).first_requested(), 99);
        assert_eq!(PageSelection::Range(7, 12).first_requested(), 7);
        assert_eq!(PageSelection::Set(vec![9, 4, 11]).first_requested(), 4);
    }
}
