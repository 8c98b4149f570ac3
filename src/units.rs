//! Physical-size to pixel-size conversion.
//!
//! A label is specified in centimetres; a raster is specified in pixels.
//! The bridge is the printer resolution in dots per inch:
//! `px = trunc(cm / 2.54 * dpi)`. The result is **truncated**, not rounded —
//! a 10 cm label at 203 DPI is 799 px, never 800 — because a raster one
//! pixel wider than the print head silently wraps onto the next row on the
//! printer.

use crate::error::Pdf2ZplError;

/// Centimetres per inch. DPI is defined against inches.
pub const CM_PER_INCH: f64 = 2.54;

/// Convert a physical label size to pixel dimensions at the given resolution.
///
/// Both results are truncated toward zero. Degenerate input — non-positive
/// or non-finite dimensions, a zero DPI, or a size so small it truncates to
/// zero pixels — is a configuration error, reported rather than clamped.
///
/// # Example
/// ```
/// use pdf2zpl::units::to_pixel_dimensions;
///
/// let (w, h) = to_pixel_dimensions(10.0, 15.0, 203).unwrap();
/// assert_eq!((w, h), (799, 1198));
/// ```
pub fn to_pixel_dimensions(
    width_cm: f64,
    height_cm: f64,
    dpi: u32,
) -> Result<(u32, u32), Pdf2ZplError> {
    if dpi == 0 {
        return Err(Pdf2ZplError::InvalidConfig("DPI must be >= 1, got 0".into()));
    }
    let width_px = cm_to_px(width_cm, dpi, "width")?;
    let height_px = cm_to_px(height_cm, dpi, "height")?;
    Ok((width_px, height_px))
}

fn cm_to_px(cm: f64, dpi: u32, axis: &str) -> Result<u32, Pdf2ZplError> {
    if !cm.is_finite() || cm <= 0.0 {
        return Err(Pdf2ZplError::InvalidConfig(format!(
            "Label {axis} must be a positive number of centimetres, got {cm}"
        )));
    }
    let px = (cm / CM_PER_INCH * f64::from(dpi)).trunc();
    if px < 1.0 {
        return Err(Pdf2ZplError::InvalidConfig(format!(
            "Label {axis} of {cm} cm at {dpi} DPI is less than one pixel"
        )));
    }
    if px > f64::from(u32::MAX) {
        return Err(Pdf2ZplError::InvalidConfig(format!(
            "Label {axis} of {cm} cm at {dpi} DPI overflows the pixel range"
        )));
    }
    Ok(px as u32)
}
