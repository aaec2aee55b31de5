//! Byte offsets of the color channels inside a 24-bit or 32-bit pixel.
//!
//! Both the 24-bit output and the 32-bit input use the Windows DIB order
//! (blue first) regardless of host endianness.

/// Offset of the blue byte.
pub const BLUE: usize = 0;
/// Offset of the green byte.
pub const GREEN: usize = 1;
/// Offset of the red byte.
pub const RED: usize = 2;
/// Offset of the alpha byte in 32-bit pixels.
pub const ALPHA: usize = 3;

/// Write one output triple.
#[inline(always)]
pub(crate) fn put(dst: &mut [u8], red: u8, green: u8, blue: u8) {
    dst[RED] = red;
    dst[GREEN] = green;
    dst[BLUE] = blue;
}

/// Read one triple back as `(red, green, blue)`.
#[cfg(any(test, feature = "rgb"))]
#[inline(always)]
pub(crate) fn get(px: &[u8]) -> (u8, u8, u8) {
    (px[RED], px[GREEN], px[BLUE])
}
