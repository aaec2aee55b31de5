//! Truncating copies: 32-bit BGRA and 16-bit-per-channel RGB(A) to 24-bit.

use crate::layout;

/// Drop the alpha byte. Source and destination share the channel layout.
pub(crate) fn bgra32_row(src: &[u8], dst: &mut [u8], width: usize) {
    let src = &src[..width * 4];
    let dst = &mut dst[..width * 3];

    #[cfg(feature = "simd")]
    {
        if garb::bytes::rgba_to_rgb(src, dst).is_ok() {
            return;
        }
    }

    for (s, d) in src.chunks_exact(4).zip(dst.chunks_exact_mut(3)) {
        d[layout::BLUE] = s[layout::BLUE];
        d[layout::GREEN] = s[layout::GREEN];
        d[layout::RED] = s[layout::RED];
    }
}

/// Keep the high byte of each 16-bit channel. `CHANNELS` is 3 (RGB) or 4 (RGBA).
pub(crate) fn rgb16_row<const CHANNELS: usize>(src: &[u8], dst: &mut [u8], width: usize) {
    for (s, d) in src
        .chunks_exact(CHANNELS * 2)
        .take(width)
        .zip(dst.chunks_exact_mut(3))
    {
        let high = |c: usize| (u16::from_ne_bytes([s[c * 2], s[c * 2 + 1]]) >> 8) as u8;
        layout::put(d, high(0), high(1), high(2));
    }
}
