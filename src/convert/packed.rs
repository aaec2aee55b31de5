//! 16-bit packed truecolor (5-5-5 and 5-6-5) expansion.

use crate::layout;
use crate::pixel::ChannelMasks;

/// Which 16-bit packing a bitmap uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PackedLayout {
    /// 5 bits per channel, top bit unused.
    Rgb555,
    /// 5 bits red, 6 bits green, 5 bits blue.
    Rgb565,
}

impl PackedLayout {
    /// 5-6-5 only when the masks match exactly; anything else, all-zero
    /// masks included, is 5-5-5.
    pub fn from_masks(masks: ChannelMasks) -> Self {
        if masks == ChannelMasks::RGB565 {
            Self::Rgb565
        } else {
            Self::Rgb555
        }
    }

    fn fields(self) -> [Field; 3] {
        match self {
            Self::Rgb555 => [
                Field::new(ChannelMasks::RGB555.red, 10, 0x1F),
                Field::new(ChannelMasks::RGB555.green, 5, 0x1F),
                Field::new(ChannelMasks::RGB555.blue, 0, 0x1F),
            ],
            Self::Rgb565 => [
                Field::new(ChannelMasks::RGB565.red, 11, 0x1F),
                Field::new(ChannelMasks::RGB565.green, 5, 0x3F),
                Field::new(ChannelMasks::RGB565.blue, 0, 0x1F),
            ],
        }
    }
}

#[derive(Clone, Copy)]
struct Field {
    mask: u32,
    shift: u32,
    max: u32,
}

impl Field {
    const fn new(mask: u32, shift: u32, max: u32) -> Self {
        Self { mask, shift, max }
    }

    /// Floor division, not rounding: 0..=max maps onto 0..=255.
    #[inline(always)]
    fn scale(self, word: u32) -> u8 {
        (((word & self.mask) >> self.shift) * 0xFF / self.max) as u8
    }
}

pub(crate) fn packed16_row(src: &[u8], dst: &mut [u8], width: usize, packing: PackedLayout) {
    let [r, g, b] = packing.fields();
    for (s, d) in src.chunks_exact(2).take(width).zip(dst.chunks_exact_mut(3)) {
        let word = u32::from(u16::from_ne_bytes([s[0], s[1]]));
        layout::put(d, r.scale(word), g.scale(word), b.scale(word));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    fn row(words: &[u16]) -> Vec<u8> {
        words.iter().flat_map(|w| w.to_ne_bytes()).collect()
    }

    fn convert(words: &[u16], packing: PackedLayout) -> Vec<(u8, u8, u8)> {
        let src = row(words);
        let mut dst = vec![0u8; words.len() * 3];
        packed16_row(&src, &mut dst, words.len(), packing);
        dst.chunks_exact(3).map(layout::get).collect()
    }

    #[test]
    fn layout_selection() {
        assert_eq!(PackedLayout::from_masks(ChannelMasks::RGB565), PackedLayout::Rgb565);
        assert_eq!(PackedLayout::from_masks(ChannelMasks::RGB555), PackedLayout::Rgb555);
        assert_eq!(PackedLayout::from_masks(ChannelMasks::default()), PackedLayout::Rgb555);
        // Partial match is not 5-6-5.
        let odd = ChannelMasks::new(0xF800, 0x07E0, 0x000F);
        assert_eq!(PackedLayout::from_masks(odd), PackedLayout::Rgb555);
    }

    #[test]
    fn rgb555_extremes() {
        let px = convert(&[0x7C00, 0x03E0, 0x001F, 0x0000, 0x7FFF], PackedLayout::Rgb555);
        assert_eq!(px[0], (255, 0, 0));
        assert_eq!(px[1], (0, 255, 0));
        assert_eq!(px[2], (0, 0, 255));
        assert_eq!(px[3], (0, 0, 0));
        assert_eq!(px[4], (255, 255, 255));
    }

    #[test]
    fn rgb555_ignores_top_bit() {
        assert_eq!(convert(&[0x8000], PackedLayout::Rgb555)[0], (0, 0, 0));
    }

    #[test]
    fn rgb565_extremes() {
        let px = convert(&[0xF800, 0x07E0, 0x001F, 0xFFFF], PackedLayout::Rgb565);
        assert_eq!(px[0], (255, 0, 0));
        assert_eq!(px[1], (0, 255, 0));
        assert_eq!(px[2], (0, 0, 255));
        assert_eq!(px[3], (255, 255, 255));
    }

    #[test]
    fn scaling_floors() {
        // 1 * 255 / 31 = 8.22 -> 8; 16 * 255 / 31 = 131.6 -> 131.
        let px = convert(&[(1 << 10) | (16 << 5) | 30], PackedLayout::Rgb555);
        assert_eq!(px[0], (8, 131, 246));
        // 6-bit green: 1 * 255 / 63 = 4.04 -> 4; 32 -> 129.5 -> 129.
        let px = convert(&[1 << 5, 32 << 5], PackedLayout::Rgb565);
        assert_eq!(px[0].1, 4);
        assert_eq!(px[1].1, 129);
    }
}
