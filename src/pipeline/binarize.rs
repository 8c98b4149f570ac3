//! Binarisation: rendered page image → monochrome raster at label geometry.
//!
//! The rendered page keeps the source page's aspect ratio; the label stock
//! does not. This stage resizes each page to **exactly** the target pixel
//! dimensions derived from the physical label size (`resize_exact`, so a
//! mismatched aspect ratio stretches rather than crops — the printed label
//! must fill the stock), converts to 8-bit luma, and thresholds into a
//! [`MonochromeRaster`].

use crate::error::Pdf2ZplError;
use crate::raster::MonochromeRaster;
use image::imageops::FilterType;
use image::DynamicImage;
use tracing::debug;

/// Resize, grayscale, and threshold one rendered page.
///
/// `target` is the `(width, height)` pixel geometry from
/// [`crate::units::to_pixel_dimensions`]; the returned raster reports
/// exactly these dimensions. A pixel is DARK when its luma is below
/// `threshold` (flipped by `invert`).
pub fn binarize_page(
    img: &DynamicImage,
    target: (u32, u32),
    threshold: u8,
    invert: bool,
) -> Result<MonochromeRaster, Pdf2ZplError> {
    let (width, height) = target;
    if width == 0 || height == 0 {
        return Err(Pdf2ZplError::EmptyRaster { width, height });
    }

    let resized = img.resize_exact(width, height, FilterType::Triangle);
    let luma = resized.to_luma8();
    debug!(
        "Binarised page: {}x{} → {}x{} @ threshold {}",
        img.width(),
        img.height(),
        width,
        height,
        threshold
    );

    MonochromeRaster::from_luma(&luma, threshold, invert)
}
