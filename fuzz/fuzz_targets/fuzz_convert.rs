#![no_main]
use libfuzzer_sys::fuzz_target;
use zendepth::*;

const SOURCES: [(PixelType, u32); 12] = [
    (PixelType::Bitmap, 1),
    (PixelType::Bitmap, 2),
    (PixelType::Bitmap, 4),
    (PixelType::Bitmap, 8),
    (PixelType::Bitmap, 16),
    (PixelType::Bitmap, 24),
    (PixelType::Bitmap, 32),
    (PixelType::Rgb16, 48),
    (PixelType::Rgba16, 64),
    (PixelType::RgbF, 96),
    (PixelType::RgbaF, 128),
    (PixelType::Float, 32),
];

fuzz_target!(|data: &[u8]| {
    // Header: source kind, width, height, pitch padding, flags. Rest is pixels and palette.
    let [kind, w, h, pad, flags, rest @ ..] = data else {
        return;
    };
    let (pixel_type, bpp) = SOURCES[usize::from(*kind) % SOURCES.len()];
    let width = u32::from(*w % 64) + 1;
    let height = u32::from(*h % 64) + 1;
    let pitch = (width as usize * bpp as usize).div_ceil(8) + usize::from(*pad % 8);

    let mut pixels = rest.to_vec();
    pixels.resize(pitch * height as usize, 0);
    let Ok(mut src) = Bitmap::from_raw(pixel_type, width, height, bpp, pitch, pixels) else {
        return;
    };

    if bpp <= 8 && pixel_type == PixelType::Bitmap {
        // Palette length from the flags byte, so short palettes get exercised.
        let len = usize::from(*flags).min(1 << bpp);
        let palette = rest
            .chunks_exact(3)
            .take(len)
            .map(|c| PaletteEntry::new(c[0], c[1], c[2]))
            .collect();
        let _ = src.set_palette(palette);
    }
    if flags & 0x80 != 0 {
        src.set_masks(ChannelMasks::RGB565);
    }
    let permissiveness = if flags & 0x40 != 0 {
        Permissiveness::Permissive
    } else {
        Permissiveness::Standard
    };

    // Must never panic; a result, if any, keeps the source dimensions.
    if let Ok(out) = ConvertRequest::new(&src)
        .with_permissiveness(permissiveness)
        .convert(enough::Unstoppable)
    {
        assert_eq!(out.width(), width);
        assert_eq!(out.height(), height);
        assert_eq!(out.bpp(), 24);
    }
});
