//! # pdf2zpl
//!
//! Convert PDF documents into ZPL (Zebra Programming Language) label
//! graphics.
//!
//! ## Why this crate?
//!
//! Thermal label printers do not speak PDF. They accept a command stream in
//! which a bitmap travels as a `^GFA` graphic field: a length-prefixed,
//! hex-encoded, 1-bit-per-pixel image. This crate rasterises each PDF page
//! via pdfium, resizes it to a physical label geometry, thresholds it to
//! monochrome, and packs it bit-exactly into that field. The packing
//! arithmetic — MSB-first bit order, per-row zero padding, the three size
//! parameters of the field header — must be exact, or the label prints
//! sheared, truncated, or blank.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input     validate path / enumerate a batch directory
//!  ├─ 2. Render    rasterise pages via pdfium (CPU-bound, spawn_blocking)
//!  ├─ 3. Binarize  resize to label geometry, threshold to 1-bit
//!  ├─ 4. Encode    pack rows MSB-first into a ^GFA hex field
//!  └─ 5. Output    one .zpl file per page + per-document report
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2zpl::{convert, LabelConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Defaults: 10 cm x 15 cm label at 203 DPI.
//!     let config = LabelConfig::default();
//!     let output = convert("shipping_label.pdf", &config).await?;
//!     for page in output.successful_pages() {
//!         println!("{}", page.zpl);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! The encoder core is usable on its own, without pdfium:
//!
//! ```rust
//! use pdf2zpl::raster::{MonochromeRaster, Pixel};
//!
//! let dot = MonochromeRaster::from_fn(1, 1, |_, _| Pixel::Dark).unwrap();
//! assert_eq!(pdf2zpl::zpl::encode(&dot).unwrap(),
//!            "^XA\n^FO0,0\n^GFA,1,1,1,80\n^XZ");
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2zpl` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only
//! deps:
//! ```toml
//! pdf2zpl = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod batch;
pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod raster;
pub mod stream;
pub mod units;
pub mod zpl;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use batch::{run_batch, BatchSummary, DocumentReport};
pub use config::{LabelConfig, LabelConfigBuilder, PageSelection};
pub use convert::{convert, convert_from_bytes, convert_sync, convert_to_files, inspect};
pub use error::{PageError, Pdf2ZplError};
pub use output::{ConversionOutput, ConversionStats, DocumentMetadata, PageResult};
pub use progress::{EncodeProgress, NoopProgress, ProgressCallback};
pub use raster::{MonochromeRaster, Pixel};
pub use stream::convert_stream;
