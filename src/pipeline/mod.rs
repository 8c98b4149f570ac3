//! Pipeline stages for PDF-to-ZPL conversion.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. switch rendering backend) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ render ──▶ binarize ──▶ zpl
//! (path)    (pdfium)   (1-bit)     (^GFA field)
//! ```
//!
//! 1. [`input`]    — validate the user-supplied PDF path, or enumerate a
//!    directory of PDFs for batch mode
//! 2. [`render`]   — rasterise selected pages; runs in `spawn_blocking`
//!    because pdfium is not async-safe
//! 3. [`binarize`] — resize each page to the target label geometry and
//!    threshold it into a [`crate::raster::MonochromeRaster`]
//!
//! The final stage, the ZPL encoder itself, lives in [`crate::zpl`] — it is
//! the pure core of the crate and is usable without any of the stages above.

pub mod binarize;
pub mod input;
pub mod render;
