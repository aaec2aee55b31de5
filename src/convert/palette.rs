//! 1/4/8-bit palette index expansion.

use crate::layout;
use crate::pixel::PaletteEntry;

use super::{IndexOutOfRange, Permissiveness};

/// Index of pixel `x` in a 1-bit row: MSB first.
#[inline(always)]
fn index1(src: &[u8], x: usize) -> u8 {
    (src[x >> 3] >> (7 - (x & 7))) & 0x01
}

/// Index of pixel `x` in a 4-bit row: high nibble first.
#[inline(always)]
fn index4(src: &[u8], x: usize) -> u8 {
    let byte = src[x >> 1];
    if x & 1 == 0 { byte >> 4 } else { byte & 0x0F }
}

pub(crate) fn indexed1_row(
    src: &[u8],
    dst: &mut [u8],
    width: usize,
    palette: &[PaletteEntry],
    permissiveness: Permissiveness,
) -> Result<usize, IndexOutOfRange> {
    expand((0..width).map(|x| index1(src, x)), dst, palette, permissiveness)
}

pub(crate) fn indexed4_row(
    src: &[u8],
    dst: &mut [u8],
    width: usize,
    palette: &[PaletteEntry],
    permissiveness: Permissiveness,
) -> Result<usize, IndexOutOfRange> {
    expand((0..width).map(|x| index4(src, x)), dst, palette, permissiveness)
}

pub(crate) fn indexed8_row(
    src: &[u8],
    dst: &mut [u8],
    width: usize,
    palette: &[PaletteEntry],
    permissiveness: Permissiveness,
) -> Result<usize, IndexOutOfRange> {
    expand(src[..width].iter().copied(), dst, palette, permissiveness)
}

/// Look up every index and write the triples. Returns the number of clamped indices.
fn expand(
    indices: impl Iterator<Item = u8>,
    dst: &mut [u8],
    palette: &[PaletteEntry],
    permissiveness: Permissiveness,
) -> Result<usize, IndexOutOfRange> {
    let mut clamped = 0;
    for (idx, out) in indices.zip(dst.chunks_exact_mut(3)) {
        let idx = usize::from(idx);
        let entry = match palette.get(idx) {
            Some(entry) => *entry,
            None if permissiveness == Permissiveness::Permissive => {
                clamped += 1;
                palette.last().copied().unwrap_or_default()
            }
            None => {
                return Err(IndexOutOfRange {
                    index: idx,
                    palette_len: palette.len(),
                    row: 0,
                });
            }
        };
        layout::put(out, entry.red, entry.green, entry.blue);
    }
    Ok(clamped)
}
