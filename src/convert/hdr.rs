//! Linear float RGB(A) to 8-bit through a Rec. 709-style transfer curve.

use crate::layout;

/// Slope of the linear toe.
pub const TOE_SLOPE: f32 = 4.5;
/// Inputs at or below this use the linear toe.
pub const TOE_END: f32 = 0.018;
/// Exponent of the power segment (about 1/2.2 adjusted for the toe).
pub const GAMMA_INV: f32 = 0.409090;

/// Encode one linear channel value to a byte.
///
/// Values above 1.0 clamp to 1.0. There is no lower clamp: negative input goes
/// through the toe and the final saturating cast turns it into 0, as it does NaN.
/// The `+ 0.5` then truncate is kept as is; it is not symmetric rounding.
#[inline]
pub fn encode_channel(value: f32) -> u8 {
    // Comparison, not `f32::min`, so NaN is not replaced by 1.0.
    let v = if value > 1.0 { 1.0 } else { value };
    let encoded = if v <= TOE_END {
        v * TOE_SLOPE
    } else {
        (1.099 * f64::from(v.powf(GAMMA_INV)) - 0.099) as f32
    };
    (f64::from(encoded * 255.0) + 0.5) as u8
}

/// `CHANNELS` is 3 (RGBF) or 4 (RGBAF); alpha is never read.
pub(crate) fn float_row<const CHANNELS: usize>(src: &[u8], dst: &mut [u8], width: usize) {
    for (s, d) in src
        .chunks_exact(CHANNELS * 4)
        .take(width)
        .zip(dst.chunks_exact_mut(3))
    {
        let channel = |c: usize| {
            let o = c * 4;
            encode_channel(f32::from_ne_bytes([s[o], s[o + 1], s[o + 2], s[o + 3]]))
        };
        layout::put(d, channel(0), channel(1), channel(2));
    }
}
