/// Pixel type tag of a [`Bitmap`](crate::Bitmap).
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelType {
    /// Standard integer bitmap: 1/4/8-bit indexed, 16-bit packed, 24/32-bit truecolor.
    Bitmap,
    /// Single channel, unsigned 16-bit.
    Uint16,
    /// Single channel, signed 16-bit.
    Int16,
    /// Single channel, unsigned 32-bit.
    Uint32,
    /// Single channel, signed 32-bit.
    Int32,
    /// Single channel, 32-bit float.
    Float,
    /// Single channel, 64-bit float.
    Double,
    /// Two 64-bit floats (real, imaginary).
    Complex,
    /// 3 channels, 16-bit RGB (native endian).
    Rgb16,
    /// 4 channels, 16-bit RGBA (native endian).
    Rgba16,
    /// 3 channels, 32-bit float RGB, linear light.
    RgbF,
    /// 4 channels, 32-bit float RGBA, linear light.
    RgbaF,
}

impl PixelType {
    /// Bit depth implied by the tag, or `None` for [`PixelType::Bitmap`],
    /// whose depth is chosen per bitmap.
    pub fn fixed_bits_per_pixel(&self) -> Option<u32> {
        match self {
            Self::Bitmap => None,
            Self::Uint16 | Self::Int16 => Some(16),
            Self::Uint32 | Self::Int32 | Self::Float => Some(32),
            Self::Rgb16 => Some(48),
            Self::Double | Self::Rgba16 => Some(64),
            Self::RgbF => Some(96),
            Self::Complex | Self::RgbaF => Some(128),
        }
    }

    /// Whether [`convert_to_24bits`](crate::convert_to_24bits) accepts this tag.
    pub fn is_convertible(&self) -> bool {
        matches!(
            self,
            Self::Bitmap | Self::Rgb16 | Self::Rgba16 | Self::RgbF | Self::RgbaF
        )
    }
}

/// One palette color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PaletteEntry {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl PaletteEntry {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

/// Red/green/blue bit masks of a truecolor bitmap.
///
/// For 16-bit bitmaps these say where each channel sits inside the word.
/// For 24-bit output they only record channel order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ChannelMasks {
    pub red: u32,
    pub green: u32,
    pub blue: u32,
}

impl ChannelMasks {
    /// 16-bit, 5 bits per channel, top bit unused.
    pub const RGB555: Self = Self::new(0x7C00, 0x03E0, 0x001F);
    /// 16-bit, 5/6/5 bits.
    pub const RGB565: Self = Self::new(0xF800, 0x07E0, 0x001F);
    /// 24/32-bit, one byte per channel, blue in the lowest byte.
    pub const BGR24: Self = Self::new(0x00FF_0000, 0x0000_FF00, 0x0000_00FF);

    pub const fn new(red: u32, green: u32, blue: u32) -> Self {
        Self { red, green, blue }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_depths() {
        assert_eq!(PixelType::Bitmap.fixed_bits_per_pixel(), None);
        assert_eq!(PixelType::Rgb16.fixed_bits_per_pixel(), Some(48));
        assert_eq!(PixelType::Rgba16.fixed_bits_per_pixel(), Some(64));
        assert_eq!(PixelType::RgbF.fixed_bits_per_pixel(), Some(96));
        assert_eq!(PixelType::RgbaF.fixed_bits_per_pixel(), Some(128));
    }

    #[test]
    fn convertible_tags() {
        let accepted = [
            PixelType::Bitmap,
            PixelType::Rgb16,
            PixelType::Rgba16,
            PixelType::RgbF,
            PixelType::RgbaF,
        ];
        let rejected = [
            PixelType::Uint16,
            PixelType::Int16,
            PixelType::Uint32,
            PixelType::Int32,
            PixelType::Float,
            PixelType::Double,
            PixelType::Complex,
        ];
        assert!(accepted.iter().all(PixelType::is_convertible));
        assert!(!rejected.iter().any(PixelType::is_convertible));
    }

    #[test]
    fn packed_masks_do_not_overlap() {
        for m in [ChannelMasks::RGB555, ChannelMasks::RGB565] {
            assert_eq!(m.red & m.green, 0);
            assert_eq!(m.green & m.blue, 0);
            assert_eq!(m.red & m.blue, 0);
        }
        assert_eq!(ChannelMasks::RGB565.green.count_ones(), 6);
        assert_eq!(ChannelMasks::RGB555.green.count_ones(), 5);
    }
}
