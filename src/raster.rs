//! The monochrome raster value consumed by the ZPL encoder.
//!
//! A [`MonochromeRaster`] is an immutable rectangular grid of two-state
//! pixels. Every in-range coordinate has a defined value — there are no
//! partial rasters — and the constructors reject zero dimensions so an empty
//! raster is unrepresentable downstream.
//!
//! Polarity is fixed at this boundary: a pixel is [`Pixel::Dark`] when ink
//! should be laid down, regardless of how the source image encoded black.
//! Sources with inverted rasters are handled by the `invert` flag of
//! [`from_luma`](MonochromeRaster::from_luma), never by reinterpreting the
//! raster afterwards — an undetected polarity mismatch prints a photographic
//! negative of the label.

use crate::error::Pdf2ZplError;
use image::GrayImage;

/// One of the two pixel states of a monochrome raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pixel {
    /// Ink is laid down.
    Dark,
    /// Paper is left blank.
    Light,
}

/// An immutable 1-bit-per-pixel page raster.
///
/// Stored row-major, one [`Pixel`] per element. Pixel storage is an
/// implementation detail; the wire-format bit packing lives entirely in
/// [`crate::zpl`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonochromeRaster {
    width: u32,
    height: u32,
    pixels: Vec<Pixel>,
}

impl MonochromeRaster {
    /// Build a raster by sampling a closure at every coordinate.
    ///
    /// Mostly useful in tests and for synthetic labels.
    ///
    /// # Errors
    /// [`Pdf2ZplError::EmptyRaster`] when either dimension is zero.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Result<Self, Pdf2ZplError>
    where
        F: FnMut(u32, u32) -> Pixel,
    {
        if width == 0 || height == 0 {
            return Err(Pdf2ZplError::EmptyRaster { width, height });
        }
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Threshold an 8-bit grayscale image into a raster.
    ///
    /// A pixel is DARK when its luma is strictly below `threshold`; `invert`
    /// flips that decision for sources with reversed black/white polarity.
    /// A threshold of 0 therefore yields an all-LIGHT raster and 255 marks
    /// everything but pure white as DARK.
    ///
    /// # Errors
    /// [`Pdf2ZplError::EmptyRaster`] when the image has a zero dimension.
    pub fn from_luma(img: &GrayImage, threshold: u8, invert: bool) -> Result<Self, Pdf2ZplError> {
        let (width, height) = img.dimensions();
        Self::from_fn(width, height, |x, y| {
            let dark = img.get_pixel(x, y).0[0] < threshold;
            if dark != invert {
                Pixel::Dark
            } else {
                Pixel::Light
            }
        })
    }

    /// Raster width in pixels. Always >= 1.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Raster height in pixels. Always >= 1.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The pixel at `(x, y)`.
    ///
    /// # Panics
    /// Panics when the coordinate is out of range; the raster has no
    /// undefined coordinates to return.
    pub fn pixel(&self, x: u32, y: u32) -> Pixel {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) out of range for {}x{} raster",
            self.width,
            self.height
        );
        self.pixels[y as usize * self.width as usize + x as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn from_fn_rejects_zero_dimensions() {
        assert!(MonochromeRaster::from_fn(0, 10, |_, _| Pixel::Light).is_err());
        assert!(MonochromeRaster::from_fn(10, 0, |_, _| Pixel::Light).is_err());
        assert!(MonochromeRaster::from_fn(0, 0, |_, _| Pixel::Light).is_err());
    }

    #[test]
    fn from_fn_row_major_coordinates() {
        let r = MonochromeRaster::from_fn(3, 2, |x, y| {
            if (x, y) == (2, 1) {
                Pixel::Dark
            } else {
                Pixel::Light
            }
        })
        .unwrap();
        assert_eq!(r.pixel(2, 1), Pixel::Dark);
        assert_eq!(r.pixel(1, 1), Pixel::Light);
        assert_eq!(r.pixel(2, 0), Pixel::Light);
    }

    #[test]
    fn from_luma_thresholds_strictly_below() {
        let mut img = GrayImage::new(2, 1);
        img.put_pixel(0, 0, Luma([127]));
        img.put_pixel(1, 0, Luma([128]));
        let r = MonochromeRaster::from_luma(&img, 128, false).unwrap();
        assert_eq!(r.pixel(0, 0), Pixel::Dark);
        assert_eq!(r.pixel(1, 0), Pixel::Light);
    }

    #[test]
    fn from_luma_invert_flips_polarity() {
        let mut img = GrayImage::new(2, 1);
        img.put_pixel(0, 0, Luma([0]));
        img.put_pixel(1, 0, Luma([255]));
        let r = MonochromeRaster::from_luma(&img, 128, true).unwrap();
        assert_eq!(r.pixel(0, 0), Pixel::Light);
        assert_eq!(r.pixel(1, 0), Pixel::Dark);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn pixel_out_of_range_panics() {
        let r = MonochromeRaster::from_fn(2, 2, |_, _| Pixel::Light).unwrap();
        r.pixel(2, 0);
    }
}
