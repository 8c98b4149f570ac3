//! The ZPL bitmap encoder — the core of the crate.
//!
//! [`encode`] turns one [`MonochromeRaster`] into the text of a complete
//! label: a `^GFA` (Graphic Field, ASCII hex) command wrapped in `^XA…^XZ`
//! label markup. The field carries three size parameters and the bitmap:
//!
//! ```text
//! ^XA
//! ^FO0,0
//! ^GFA,<total_bytes>,<total_bytes>,<bytes_per_row>,<HEXDATA>
//! ^XZ
//! ```
//!
//! * `bytes_per_row = ceil(width / 8)` — each row is padded with zero bits
//!   (LIGHT) to the next byte boundary; padding never carries across rows.
//! * `total_bytes = bytes_per_row * height` — appears twice because the
//!   graphic byte count and the total field byte count are equal when the
//!   bitmap is uncompressed.
//! * `HEXDATA` — the packed rows, top to bottom, as uppercase zero-padded
//!   hex pairs with no separators. Within a byte the leftmost pixel is the
//!   most significant bit.
//!
//! These three numbers and the bit order must agree exactly: a printer walks
//! the hex data by `bytes_per_row`, so an off-by-one in any of them shears or
//! truncates the printed label.

use crate::error::Pdf2ZplError;
use crate::raster::{MonochromeRaster, Pixel};
use std::fmt::Write as _;

/// Bytes needed for one packed row of `width` pixels: `ceil(width / 8)`.
pub fn bytes_per_row(width: u32) -> u32 {
    width.div_ceil(8)
}

/// Bit-accumulator state machine for packing one row.
///
/// Pixels are pushed left to right; every 8th push closes the accumulator
/// and yields a byte. [`RowPacker::finish_row`] closes a final partial byte
/// with its unused low-order bits zero (LIGHT). Keeping the row-boundary
/// flush rule here, separate from the scan loop, makes it testable on its
/// own.
#[derive(Debug, Default)]
pub struct RowPacker {
    acc: u8,
    bits: u8,
}

impl RowPacker {
    /// A packer with an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push the next pixel of the current row.
    ///
    /// Returns `Some(byte)` when this pixel completed a group of 8.
    pub fn push(&mut self, pixel: Pixel) -> Option<u8> {
        if pixel == Pixel::Dark {
            self.acc |= 1 << (7 - self.bits);
        }
        self.bits += 1;
        if self.bits == 8 {
            Some(self.take())
        } else {
            None
        }
    }

    /// Close the row, flushing a final partial byte if any bits are pending.
    ///
    /// The accumulator is left empty, ready for the next row.
    pub fn finish_row(&mut self) -> Option<u8> {
        if self.bits > 0 {
            Some(self.take())
        } else {
            None
        }
    }

    fn take(&mut self) -> u8 {
        let byte = self.acc;
        self.acc = 0;
        self.bits = 0;
        byte
    }
}

/// Encode a raster as a complete single-label ZPL document.
///
/// Pure and deterministic: the same raster always yields byte-identical
/// output, and nothing is shared between calls.
///
/// # Errors
/// [`Pdf2ZplError::EmptyRaster`] when the raster reports a zero dimension —
/// a contract violation from the rasteriser, never encoded.
pub fn encode(raster: &MonochromeRaster) -> Result<String, Pdf2ZplError> {
    let (width, height) = (raster.width(), raster.height());
    if width == 0 || height == 0 {
        return Err(Pdf2ZplError::EmptyRaster { width, height });
    }

    let row_bytes = bytes_per_row(width);
    let total_bytes = u64::from(row_bytes) * u64::from(height);

    // Header + hex data + trailer, sized up front to avoid reallocation on
    // large labels (a 799x1198 label is ~240 KB of hex).
    let mut zpl = String::with_capacity(2 * total_bytes as usize + 64);
    write!(zpl, "^XA\n^FO0,0\n^GFA,{total_bytes},{total_bytes},{row_bytes},")
        .map_err(|e| Pdf2ZplError::Internal(format!("formatting ZPL header: {e}")))?;

    let mut packer = RowPacker::new();
    for y in 0..height {
        for x in 0..width {
            if let Some(byte) = packer.push(raster.pixel(x, y)) {
                write!(zpl, "{byte:02X}")
                    .map_err(|e| Pdf2ZplError::Internal(format!("formatting hex data: {e}")))?;
            }
        }
        if let Some(byte) = packer.finish_row() {
            write!(zpl, "{byte:02X}")
                .map_err(|e| Pdf2ZplError::Internal(format!("formatting hex data: {e}")))?;
        }
    }

    zpl.push_str("\n^XZ");
    Ok(zpl)
}

/// The hex payload of an encoded label, without markup.
///
/// Convenience for tests and for callers embedding the graphic into their
/// own label template.
pub fn hex_data(zpl: &str) -> Option<&str> {
    // ^GFA,<a>,<b>,<c>,<hex>\n^XZ
    let start = zpl.find("^GFA,")?;
    let after = &zpl[start + 5..];
    let mut commas = after.match_indices(',').map(|(i, _)| i);
    let (_, _, third) = (commas.next()?, commas.next()?, commas.next()?);
    let hex = &after[third + 1..];
    Some(hex.strip_suffix("\n^XZ").unwrap_or(hex))
}
