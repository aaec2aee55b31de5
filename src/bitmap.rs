//! Owned bitmap: pixel buffer, row pitch, palette, masks and metadata.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use crate::error::ConvertError;
use crate::limits::Limits;
use crate::pixel::{ChannelMasks, PaletteEntry, PixelType};

/// Auxiliary data carried along with the pixels.
///
/// The converter never interprets it; it is copied once from source to destination.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Metadata {
    pub dots_per_meter_x: u32,
    pub dots_per_meter_y: u32,
    /// Free-form textual tags (key → value).
    pub tags: BTreeMap<String, String>,
}

/// A 2D grid of pixels stored top-down, `pitch` bytes per row.
///
/// Multi-byte samples (16-bit words, 16-bit channels, f32 channels) are stored
/// in native byte order.
#[derive(Clone, Debug, PartialEq)]
pub struct Bitmap {
    pixel_type: PixelType,
    width: u32,
    height: u32,
    bpp: u32,
    pitch: usize,
    masks: ChannelMasks,
    palette: Vec<PaletteEntry>,
    metadata: Metadata,
    data: Vec<u8>,
}

impl Bitmap {
    /// Allocate a zero-filled bitmap with a DWORD-aligned pitch.
    ///
    /// `bpp` must match the implied depth for every tag except
    /// [`PixelType::Bitmap`], where any depth from 1 to 32 is accepted.
    /// Indexed bitmaps (depth ≤ 8) get a black palette of `2^bpp` entries.
    pub fn allocate(
        pixel_type: PixelType,
        width: u32,
        height: u32,
        bpp: u32,
    ) -> Result<Self, ConvertError> {
        Self::allocate_with_limits(pixel_type, width, height, bpp, None)
    }

    /// [`Bitmap::allocate`] with dimension and memory limits.
    pub fn allocate_with_limits(
        pixel_type: PixelType,
        width: u32,
        height: u32,
        bpp: u32,
        limits: Option<&Limits>,
    ) -> Result<Self, ConvertError> {
        check_dimensions(width, height)?;
        check_depth(pixel_type, bpp)?;
        if let Some(limits) = limits {
            limits.check(width, height)?;
        }
        let pitch = aligned_pitch(width, bpp)
            .ok_or(ConvertError::DimensionsTooLarge { width, height })?;
        let size = pitch
            .checked_mul(height as usize)
            .ok_or(ConvertError::DimensionsTooLarge { width, height })?;
        if let Some(limits) = limits {
            limits.check_memory(size)?;
        }
        let mut data = try_alloc(size)?;
        data.resize(size, 0);

        Ok(Self {
            pixel_type,
            width,
            height,
            bpp,
            pitch,
            masks: ChannelMasks::default(),
            palette: alloc::vec![PaletteEntry::default(); palette_capacity(pixel_type, bpp)],
            metadata: Metadata::default(),
            data,
        })
    }

    /// Wrap an existing pixel buffer.
    ///
    /// `pitch` is the distance in bytes between the start of consecutive rows and
    /// must be at least the packed row size. The buffer must hold at least
    /// `(height - 1) * pitch + row_bytes` bytes; the last row needs no padding.
    pub fn from_raw(
        pixel_type: PixelType,
        width: u32,
        height: u32,
        bpp: u32,
        pitch: usize,
        data: Vec<u8>,
    ) -> Result<Self, ConvertError> {
        check_dimensions(width, height)?;
        check_depth(pixel_type, bpp)?;
        let row_bytes = packed_row_bytes(width, bpp)
            .ok_or(ConvertError::DimensionsTooLarge { width, height })?;
        if row_bytes > pitch {
            return Err(ConvertError::InvalidStride { pitch, row_bytes });
        }
        let needed = (height as usize - 1)
            .checked_mul(pitch)
            .and_then(|v| v.checked_add(row_bytes))
            .ok_or(ConvertError::DimensionsTooLarge { width, height })?;
        if data.len() < needed {
            return Err(ConvertError::BufferTooSmall {
                needed,
                actual: data.len(),
            });
        }

        Ok(Self {
            pixel_type,
            width,
            height,
            bpp,
            pitch,
            masks: ChannelMasks::default(),
            palette: alloc::vec![PaletteEntry::default(); palette_capacity(pixel_type, bpp)],
            metadata: Metadata::default(),
            data,
        })
    }

    pub fn pixel_type(&self) -> PixelType {
        self.pixel_type
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bits per pixel.
    pub fn bpp(&self) -> u32 {
        self.bpp
    }

    /// Bytes from the start of one row to the start of the next.
    pub fn pitch(&self) -> usize {
        self.pitch
    }

    /// Bytes of pixel data in one row, without padding.
    pub fn row_bytes(&self) -> usize {
        // Validated at construction.
        packed_row_bytes(self.width, self.bpp).unwrap_or(self.pitch)
    }

    pub fn masks(&self) -> ChannelMasks {
        self.masks
    }

    pub fn set_masks(&mut self, masks: ChannelMasks) {
        self.masks = masks;
    }

    /// Palette entries. Empty unless this is an indexed bitmap.
    pub fn palette(&self) -> &[PaletteEntry] {
        &self.palette
    }

    pub fn palette_mut(&mut self) -> &mut [PaletteEntry] {
        &mut self.palette
    }

    /// Replace the palette.
    ///
    /// A palette shorter than `2^bpp` is accepted; pixels indexing past its
    /// end are caught at conversion time.
    pub fn set_palette(&mut self, entries: Vec<PaletteEntry>) -> Result<(), ConvertError> {
        let capacity = palette_capacity(self.pixel_type, self.bpp);
        if capacity == 0 {
            return Err(ConvertError::InvalidPalette(alloc::format!(
                "{}-bit {:?} bitmap has no palette",
                self.bpp,
                self.pixel_type
            )));
        }
        if entries.len() > capacity {
            return Err(ConvertError::InvalidPalette(alloc::format!(
                "{} entries exceed {capacity} for {}-bit depth",
                entries.len(),
                self.bpp
            )));
        }
        self.palette = entries;
        Ok(())
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    /// Copy `src`'s metadata into this bitmap, replacing what was there.
    pub fn copy_metadata_from(&mut self, src: &Bitmap) {
        self.metadata.clone_from(&src.metadata);
    }

    /// Full verbatim copy, metadata included.
    pub fn duplicate(&self) -> Bitmap {
        self.clone()
    }

    /// Pixel bytes of row `y`, without padding.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    pub fn scanline(&self, y: u32) -> &[u8] {
        let start = y as usize * self.pitch;
        &self.data[start..start + self.row_bytes()]
    }

    /// Mutable pixel bytes of row `y`, without padding.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    pub fn scanline_mut(&mut self, y: u32) -> &mut [u8] {
        let start = y as usize * self.pitch;
        let row_bytes = self.row_bytes();
        &mut self.data[start..start + row_bytes]
    }

    /// Iterate rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        (0..self.height).map(move |y| self.scanline(y))
    }

    /// The whole backing buffer, padding included.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Copy honoring memory limits, reporting allocation failure instead of aborting.
    pub(crate) fn duplicate_with_limits(
        &self,
        limits: Option<&Limits>,
    ) -> Result<Bitmap, ConvertError> {
        if let Some(limits) = limits {
            limits.check(self.width, self.height)?;
            limits.check_memory(self.data.len())?;
        }
        let mut data = try_alloc(self.data.len())?;
        data.extend_from_slice(&self.data);
        Ok(Bitmap {
            pixel_type: self.pixel_type,
            width: self.width,
            height: self.height,
            bpp: self.bpp,
            pitch: self.pitch,
            masks: self.masks,
            palette: self.palette.clone(),
            metadata: self.metadata.clone(),
            data,
        })
    }

    /// Pixels in logical RGB order, row-major, padding removed.
    ///
    /// Fails with [`ConvertError::LayoutMismatch`] unless this is a 24-bit bitmap.
    #[cfg(feature = "rgb")]
    pub fn to_rgb8_vec(&self) -> Result<Vec<rgb::RGB8>, ConvertError> {
        if self.pixel_type != PixelType::Bitmap || self.bpp != 24 {
            return Err(ConvertError::LayoutMismatch {
                pixel_type: self.pixel_type,
                bpp: self.bpp,
            });
        }
        let mut out = Vec::with_capacity(self.width as usize * self.height as usize);
        for row in self.rows() {
            out.extend(row.chunks_exact(3).map(|px| {
                let (r, g, b) = crate::layout::get(px);
                rgb::RGB8::new(r, g, b)
            }));
        }
        Ok(out)
    }

    /// Contiguous [`imgref::ImgVec`] of RGB pixels.
    ///
    /// Fails with [`ConvertError::LayoutMismatch`] unless this is a 24-bit bitmap.
    #[cfg(feature = "imgref")]
    pub fn to_imgvec(&self) -> Result<imgref::ImgVec<rgb::RGB8>, ConvertError> {
        let pixels = self.to_rgb8_vec()?;
        Ok(imgref::ImgVec::new(
            pixels,
            self.width as usize,
            self.height as usize,
        ))
    }
}

fn check_dimensions(width: u32, height: u32) -> Result<(), ConvertError> {
    if width == 0 || height == 0 {
        return Err(ConvertError::InvalidDimensions { width, height });
    }
    Ok(())
}

fn check_depth(pixel_type: PixelType, bpp: u32) -> Result<(), ConvertError> {
    let valid = match pixel_type.fixed_bits_per_pixel() {
        Some(fixed) => fixed == bpp,
        None => (1..=32).contains(&bpp),
    };
    if valid {
        Ok(())
    } else {
        Err(ConvertError::UnsupportedBitDepth { pixel_type, bpp })
    }
}

fn packed_row_bytes(width: u32, bpp: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(bpp as usize)?
        .checked_add(7)
        .map(|bits| bits / 8)
}

fn aligned_pitch(width: u32, bpp: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(bpp as usize)?
        .checked_add(31)
        .map(|bits| bits / 32 * 4)
}

fn palette_capacity(pixel_type: PixelType, bpp: u32) -> usize {
    if pixel_type == PixelType::Bitmap && bpp <= 8 {
        1 << bpp
    } else {
        0
    }
}

fn try_alloc(bytes: usize) -> Result<Vec<u8>, ConvertError> {
    let mut data = Vec::new();
    data.try_reserve_exact(bytes)
        .map_err(|_| ConvertError::AllocationFailed { bytes })?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn pitch_is_dword_aligned() {
        let cases = [
            (1, 1, 4),
            (33, 1, 8),
            (1, 4, 4),
            (9, 4, 8),
            (3, 8, 4),
            (5, 16, 12),
            (5, 24, 16),
            (3, 32, 12),
        ];
        for (width, bpp, pitch) in cases {
            let bmp = Bitmap::allocate(PixelType::Bitmap, width, 2, bpp).unwrap();
            assert_eq!(bmp.pitch(), pitch, "width {width} bpp {bpp}");
            assert_eq!(bmp.data().len(), pitch * 2);
        }
        let hdr = Bitmap::allocate(PixelType::RgbF, 3, 1, 96).unwrap();
        assert_eq!(hdr.pitch(), 36);
    }

    #[test]
    fn zero_dimensions_rejected() {
        assert!(matches!(
            Bitmap::allocate(PixelType::Bitmap, 0, 4, 24),
            Err(ConvertError::InvalidDimensions { width: 0, height: 4 })
        ));
        assert!(matches!(
            Bitmap::from_raw(PixelType::Bitmap, 4, 0, 8, 4, vec![]),
            Err(ConvertError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn depth_must_match_pixel_type() {
        assert!(matches!(
            Bitmap::allocate(PixelType::Rgb16, 2, 2, 24),
            Err(ConvertError::UnsupportedBitDepth {
                pixel_type: PixelType::Rgb16,
                bpp: 24
            })
        ));
        assert!(Bitmap::allocate(PixelType::Rgba16, 2, 2, 64).is_ok());
        assert!(matches!(
            Bitmap::allocate(PixelType::Bitmap, 2, 2, 0),
            Err(ConvertError::UnsupportedBitDepth { .. })
        ));
        assert!(matches!(
            Bitmap::allocate(PixelType::Bitmap, 2, 2, 48),
            Err(ConvertError::UnsupportedBitDepth { .. })
        ));
        // Allocatable but not convertible.
        assert!(Bitmap::allocate(PixelType::Bitmap, 2, 2, 2).is_ok());
    }

    #[test]
    fn from_raw_validates_pitch_and_length() {
        assert!(matches!(
            Bitmap::from_raw(PixelType::Bitmap, 4, 2, 24, 11, vec![0; 24]),
            Err(ConvertError::InvalidStride {
                pitch: 11,
                row_bytes: 12
            })
        ));
        // Last row needs no padding: 16 + 12.
        assert!(Bitmap::from_raw(PixelType::Bitmap, 4, 2, 24, 16, vec![0; 28]).is_ok());
        assert!(matches!(
            Bitmap::from_raw(PixelType::Bitmap, 4, 2, 24, 16, vec![0; 27]),
            Err(ConvertError::BufferTooSmall {
                needed: 28,
                actual: 27
            })
        ));
    }

    #[test]
    fn scanline_skips_padding() {
        let data: Vec<u8> = (0..20).collect();
        let bmp = Bitmap::from_raw(PixelType::Bitmap, 2, 2, 32, 12, data).unwrap();
        assert_eq!(bmp.row_bytes(), 8);
        assert_eq!(bmp.scanline(0), &[0, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(bmp.scanline(1), &[12, 13, 14, 15, 16, 17, 18, 19]);
        assert_eq!(bmp.rows().count(), 2);
    }

    #[test]
    fn sub_byte_rows_round_up() {
        let bmp = Bitmap::allocate(PixelType::Bitmap, 9, 1, 1).unwrap();
        assert_eq!(bmp.row_bytes(), 2);
        let bmp = Bitmap::allocate(PixelType::Bitmap, 3, 1, 4).unwrap();
        assert_eq!(bmp.row_bytes(), 2);
    }

    #[test]
    fn palette_capacity_follows_depth() {
        assert_eq!(Bitmap::allocate(PixelType::Bitmap, 1, 1, 1).unwrap().palette().len(), 2);
        assert_eq!(Bitmap::allocate(PixelType::Bitmap, 1, 1, 4).unwrap().palette().len(), 16);
        assert_eq!(Bitmap::allocate(PixelType::Bitmap, 1, 1, 8).unwrap().palette().len(), 256);
        assert!(Bitmap::allocate(PixelType::Bitmap, 1, 1, 16).unwrap().palette().is_empty());
        assert!(Bitmap::allocate(PixelType::RgbF, 1, 1, 96).unwrap().palette().is_empty());
    }

    #[test]
    fn set_palette_bounds() {
        let mut bmp = Bitmap::allocate(PixelType::Bitmap, 1, 1, 1).unwrap();
        assert!(bmp.set_palette(vec![PaletteEntry::new(1, 2, 3)]).is_ok());
        assert_eq!(bmp.palette(), &[PaletteEntry::new(1, 2, 3)]);
        assert!(matches!(
            bmp.set_palette(vec![PaletteEntry::default(); 3]),
            Err(ConvertError::InvalidPalette(_))
        ));

        let mut truecolor = Bitmap::allocate(PixelType::Bitmap, 1, 1, 24).unwrap();
        assert!(matches!(
            truecolor.set_palette(vec![PaletteEntry::default()]),
            Err(ConvertError::InvalidPalette(_))
        ));
    }

    #[test]
    fn metadata_copy_and_duplicate() {
        let mut src = Bitmap::allocate(PixelType::Bitmap, 2, 2, 8).unwrap();
        src.metadata_mut().dots_per_meter_x = 2835;
        src.metadata_mut().tags.insert("Comment".into(), "hello".into());
        src.scanline_mut(1)[0] = 7;

        let mut dst = Bitmap::allocate(PixelType::Bitmap, 2, 2, 24).unwrap();
        dst.copy_metadata_from(&src);
        assert_eq!(dst.metadata(), src.metadata());

        let dup = src.duplicate();
        assert_eq!(dup, src);
        let dup = src.duplicate_with_limits(None).unwrap();
        assert_eq!(dup, src);
    }

    #[test]
    fn memory_limit_blocks_allocation() {
        let limits = Limits {
            max_memory_bytes: Some(100),
            ..Default::default()
        };
        assert!(matches!(
            Bitmap::allocate_with_limits(PixelType::Bitmap, 10, 10, 24, Some(&limits)),
            Err(ConvertError::LimitExceeded(_))
        ));
    }

    #[cfg(feature = "rgb")]
    #[test]
    fn rgb8_view_reorders_channels() {
        let mut bmp = Bitmap::allocate(PixelType::Bitmap, 2, 1, 24).unwrap();
        crate::layout::put(&mut bmp.scanline_mut(0)[0..3], 255, 128, 64);
        let px = bmp.to_rgb8_vec().unwrap();
        assert_eq!(px, vec![rgb::RGB8::new(255, 128, 64), rgb::RGB8::new(0, 0, 0)]);

        let indexed = Bitmap::allocate(PixelType::Bitmap, 2, 1, 8).unwrap();
        assert!(matches!(
            indexed.to_rgb8_vec(),
            Err(ConvertError::LayoutMismatch { bpp: 8, .. })
        ));
    }
}
