use alloc::string::String;
use enough::StopReason;

use crate::pixel::PixelType;

/// Errors from bitmap allocation and 24-bit conversion.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConvertError {
    #[error("no source bitmap")]
    MissingSource,

    #[error("unsupported pixel type: {0:?}")]
    UnsupportedPixelType(PixelType),

    #[error("unsupported bit depth {bpp} for pixel type {pixel_type:?}")]
    UnsupportedBitDepth { pixel_type: PixelType, bpp: u32 },

    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("failed to allocate {bytes} bytes")]
    AllocationFailed { bytes: usize },

    #[error("buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    #[error("pitch {pitch} is smaller than a row of {row_bytes} bytes")]
    InvalidStride { pitch: usize, row_bytes: usize },

    #[error("invalid palette: {0}")]
    InvalidPalette(String),

    #[error("palette index {index} out of range (palette has {palette_len} entries) in row {row}")]
    PaletteIndexOutOfRange {
        index: usize,
        palette_len: usize,
        row: u32,
    },

    #[error("pixel layout mismatch: expected 24-bit bitmap, got {bpp}-bit {pixel_type:?}")]
    LayoutMismatch { pixel_type: PixelType, bpp: u32 },

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl From<StopReason> for ConvertError {
    fn from(r: StopReason) -> Self {
        ConvertError::Cancelled(r)
    }
}
