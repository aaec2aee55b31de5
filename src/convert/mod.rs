//! Conversion of any supported bitmap to 24-bit truecolor.
//!
//! [`SourceEncoding::plan`] classifies the source once; the row pass then calls
//! a single row function per scanline. Rows are independent, so with the
//! `parallel` feature they run on the rayon pool.

mod direct;
mod hdr;
mod packed;
mod palette;

pub use hdr::{GAMMA_INV, TOE_END, TOE_SLOPE, encode_channel};
pub use packed::PackedLayout;

use enough::Stop;

use crate::bitmap::Bitmap;
use crate::error::ConvertError;
use crate::limits::Limits;
use crate::pixel::{ChannelMasks, PaletteEntry, PixelType};

/// How to treat palette indices that point past the end of the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Permissiveness {
    /// Fail the conversion with [`ConvertError::PaletteIndexOutOfRange`].
    #[default]
    Standard,

    /// Use the last palette entry (black for an empty palette).
    Permissive,
}

/// Source pixel encoding, one variant per supported (type, depth, packing).
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceEncoding {
    /// 1-bit palette indices, MSB first.
    Indexed1,
    /// 4-bit palette indices, high nibble first.
    Indexed4,
    /// 8-bit palette indices.
    Indexed8,
    /// 16-bit words, 5-5-5.
    Packed555,
    /// 16-bit words, 5-6-5.
    Packed565,
    /// 32-bit pixels, alpha dropped.
    Bgra32,
    /// 16 bits per channel RGB.
    Rgb16,
    /// 16 bits per channel RGBA, alpha dropped.
    Rgba16,
    /// Linear float RGB.
    RgbF,
    /// Linear float RGBA, alpha dropped.
    RgbaF,
}

/// What converting a given bitmap involves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConversionPlan {
    /// Already 24-bit: the result is a verbatim copy.
    Duplicate,
    /// Unpack every row with the given encoding.
    Unpack(SourceEncoding),
}

impl SourceEncoding {
    /// Classify `src`, or report why it cannot be converted.
    pub fn plan(src: &Bitmap) -> Result<ConversionPlan, ConvertError> {
        let encoding = match (src.pixel_type(), src.bpp()) {
            (PixelType::Bitmap, 24) => return Ok(ConversionPlan::Duplicate),
            (PixelType::Bitmap, 1) => Self::Indexed1,
            (PixelType::Bitmap, 4) => Self::Indexed4,
            (PixelType::Bitmap, 8) => Self::Indexed8,
            (PixelType::Bitmap, 16) => match PackedLayout::from_masks(src.masks()) {
                PackedLayout::Rgb555 => Self::Packed555,
                PackedLayout::Rgb565 => Self::Packed565,
            },
            (PixelType::Bitmap, 32) => Self::Bgra32,
            (PixelType::Bitmap, bpp) => {
                return Err(ConvertError::UnsupportedBitDepth {
                    pixel_type: PixelType::Bitmap,
                    bpp,
                });
            }
            (PixelType::Rgb16, _) => Self::Rgb16,
            (PixelType::Rgba16, _) => Self::Rgba16,
            (PixelType::RgbF, _) => Self::RgbF,
            (PixelType::RgbaF, _) => Self::RgbaF,
            (other, _) => return Err(ConvertError::UnsupportedPixelType(other)),
        };
        Ok(ConversionPlan::Unpack(encoding))
    }

    /// Convert one row of `width` pixels into `dst` (at least `width * 3` bytes).
    ///
    /// Returns the number of palette indices that were clamped.
    fn unpack_row(
        self,
        src: &[u8],
        dst: &mut [u8],
        width: usize,
        palette: &[PaletteEntry],
        permissiveness: Permissiveness,
    ) -> Result<usize, IndexOutOfRange> {
        match self {
            Self::Indexed1 => {
                return palette::indexed1_row(src, dst, width, palette, permissiveness);
            }
            Self::Indexed4 => {
                return palette::indexed4_row(src, dst, width, palette, permissiveness);
            }
            Self::Indexed8 => {
                return palette::indexed8_row(src, dst, width, palette, permissiveness);
            }
            Self::Packed555 => packed::packed16_row(src, dst, width, PackedLayout::Rgb555),
            Self::Packed565 => packed::packed16_row(src, dst, width, PackedLayout::Rgb565),
            Self::Bgra32 => direct::bgra32_row(src, dst, width),
            Self::Rgb16 => direct::rgb16_row::<3>(src, dst, width),
            Self::Rgba16 => direct::rgb16_row::<4>(src, dst, width),
            Self::RgbF => hdr::float_row::<3>(src, dst, width),
            Self::RgbaF => hdr::float_row::<4>(src, dst, width),
        }
        Ok(0)
    }
}

/// A palette index past the end of the palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct IndexOutOfRange {
    pub index: usize,
    pub palette_len: usize,
    pub row: u32,
}

impl From<IndexOutOfRange> for ConvertError {
    fn from(e: IndexOutOfRange) -> Self {
        ConvertError::PaletteIndexOutOfRange {
            index: e.index,
            palette_len: e.palette_len,
            row: e.row,
        }
    }
}

/// Builder for a conversion with limits or a palette policy.
///
/// ```
/// use zendepth::{Bitmap, ConvertRequest, Limits, PixelType, Unstoppable};
///
/// let src = Bitmap::allocate(PixelType::Bitmap, 4, 4, 8)?;
/// let limits = Limits { max_pixels: Some(1 << 20), ..Default::default() };
/// let out = ConvertRequest::new(&src).with_limits(&limits).convert(Unstoppable)?;
/// assert_eq!(out.bpp(), 24);
/// # Ok::<(), zendepth::ConvertError>(())
/// ```
#[derive(Clone, Debug)]
pub struct ConvertRequest<'a> {
    source: &'a Bitmap,
    limits: Option<&'a Limits>,
    permissiveness: Permissiveness,
}

impl<'a> ConvertRequest<'a> {
    pub fn new(source: &'a Bitmap) -> Self {
        Self {
            source,
            limits: None,
            permissiveness: Permissiveness::default(),
        }
    }

    /// Limits checked against the destination before it is allocated.
    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    pub fn with_permissiveness(mut self, permissiveness: Permissiveness) -> Self {
        self.permissiveness = permissiveness;
        self
    }

    /// Run the conversion. On error no bitmap is produced.
    pub fn convert(self, stop: impl Stop) -> Result<Bitmap, ConvertError> {
        convert(self.source, self.limits, self.permissiveness, &stop)
    }
}

/// Convert `src` to a new 24-bit bitmap with default settings.
pub fn convert_to_24bits(src: &Bitmap, stop: impl Stop) -> Result<Bitmap, ConvertError> {
    ConvertRequest::new(src).convert(stop)
}

/// [`convert_to_24bits`] for callers holding a possibly absent bitmap.
///
/// `None` fails with [`ConvertError::MissingSource`] before anything is allocated.
pub fn try_convert_to_24bits(
    src: Option<&Bitmap>,
    stop: impl Stop,
) -> Result<Bitmap, ConvertError> {
    let src = src.ok_or(ConvertError::MissingSource)?;
    convert_to_24bits(src, stop)
}

fn convert(
    src: &Bitmap,
    limits: Option<&Limits>,
    permissiveness: Permissiveness,
    stop: &dyn Stop,
) -> Result<Bitmap, ConvertError> {
    let plan = SourceEncoding::plan(src)?;
    stop.check()?;

    let encoding = match plan {
        ConversionPlan::Duplicate => {
            ldebug!(
                "{}x{} bitmap is already 24-bit, duplicating",
                src.width(),
                src.height()
            );
            return src.duplicate_with_limits(limits);
        }
        ConversionPlan::Unpack(encoding) => encoding,
    };

    ldebug!(
        "converting {}x{} {:?} ({}-bit) to 24-bit",
        src.width(),
        src.height(),
        src.pixel_type(),
        src.bpp()
    );
    ltrace!("source encoding {:?}", encoding);

    let mut dst =
        Bitmap::allocate_with_limits(PixelType::Bitmap, src.width(), src.height(), 24, limits)?;
    dst.set_masks(ChannelMasks::BGR24);
    dst.copy_metadata_from(src);

    let clamped = unpack_rows(src, &mut dst, encoding, permissiveness, stop)?;
    if clamped > 0 {
        lwarn!("clamped {} out-of-range palette indices", clamped);
    }

    stop.check()?;
    ldebug!("converted to {}x{} 24-bit", dst.width(), dst.height());
    Ok(dst)
}

#[cfg(not(feature = "parallel"))]
fn unpack_rows(
    src: &Bitmap,
    dst: &mut Bitmap,
    encoding: SourceEncoding,
    permissiveness: Permissiveness,
    stop: &dyn Stop,
) -> Result<usize, ConvertError> {
    let width = src.width() as usize;
    let out_bytes = width * 3;
    let pitch = dst.pitch();
    let palette = src.palette();

    let mut clamped = 0;
    for (row_idx, out) in dst.data_mut().chunks_exact_mut(pitch).enumerate() {
        if row_idx % 16 == 0 {
            stop.check()?;
        }
        let y = row_idx as u32;
        clamped += encoding
            .unpack_row(src.scanline(y), &mut out[..out_bytes], width, palette, permissiveness)
            .map_err(|e| IndexOutOfRange { row: y, ..e })?;
    }
    Ok(clamped)
}

#[cfg(feature = "parallel")]
fn unpack_rows(
    src: &Bitmap,
    dst: &mut Bitmap,
    encoding: SourceEncoding,
    permissiveness: Permissiveness,
    stop: &dyn Stop,
) -> Result<usize, ConvertError> {
    use rayon::prelude::*;

    let width = src.width() as usize;
    let out_bytes = width * 3;
    let pitch = dst.pitch();
    let palette = src.palette();

    dst.data_mut()
        .par_chunks_exact_mut(pitch)
        .enumerate()
        .map(|(row_idx, out)| -> Result<usize, ConvertError> {
            if row_idx % 16 == 0 {
                stop.check()?;
            }
            let y = row_idx as u32;
            let clamped = encoding
                .unpack_row(src.scanline(y), &mut out[..out_bytes], width, palette, permissiveness)
                .map_err(|e| IndexOutOfRange { row: y, ..e })?;
            Ok(clamped)
        })
        .try_reduce(|| 0, |a, b| Ok(a + b))
}
