//! # zendepth
//!
//! Convert in-memory bitmaps of any common pixel encoding to 24-bit truecolor
//! (8 bits per channel, no alpha).
//!
//! ## Supported sources
//!
//! - **1/4/8-bit** palette-indexed bitmaps (palette lookup)
//! - **16-bit** packed truecolor, 5-5-5 or 5-6-5 (chosen from the bitmap's masks)
//! - **24-bit**: returned as a verbatim copy
//! - **32-bit** BGRA: alpha dropped
//! - **48/64-bit** RGB16/RGBA16: high byte of each channel kept, alpha dropped
//! - **96/128-bit** float RGB/RGBA in linear light: encoded through a fixed
//!   Rec. 709-style transfer curve, alpha dropped
//!
//! The output stores each pixel as three bytes in the order given by [`layout`]
//! (blue, green, red). Use [`Bitmap::to_rgb8_vec`] (feature `rgb`) to get
//! logical RGB values.
//!
//! ## Non-Goals
//!
//! - Alpha compositing (alpha is dropped, not blended)
//! - Color management: the HDR curve is fixed, not configurable
//! - Conversion to depths other than 24-bit, dithering
//! - Reading or writing image files
//!
//! ## Feature flags
//!
//! - **`rgb`**: [`Bitmap::to_rgb8_vec`]
//! - **`imgref`**: [`Bitmap::to_imgvec`] (implies `rgb`)
//! - **`simd`**: SIMD row copy for 32-bit sources via `garb`
//! - **`parallel`**: convert rows on the rayon thread pool
//! - **`logging`**: diagnostics through the `log` crate
//!
//! ## Usage
//!
//! ```
//! use zendepth::{Bitmap, PaletteEntry, PixelType, Unstoppable, convert_to_24bits};
//!
//! let mut src = Bitmap::allocate(PixelType::Bitmap, 1, 1, 1)?;
//! src.set_palette(vec![PaletteEntry::new(0, 0, 0), PaletteEntry::new(255, 128, 64)])?;
//! src.scanline_mut(0)[0] = 0b1000_0000;
//!
//! let out = convert_to_24bits(&src, Unstoppable)?;
//! assert_eq!(out.bpp(), 24);
//! let px = out.scanline(0);
//! assert_eq!(
//!     (px[zendepth::layout::RED], px[zendepth::layout::GREEN], px[zendepth::layout::BLUE]),
//!     (255, 128, 64)
//! );
//! # Ok::<(), zendepth::ConvertError>(())
//! ```

#![forbid(unsafe_code)]

extern crate alloc;

#[macro_use]
mod log;

mod bitmap;
mod convert;
mod error;
pub mod layout;
mod limits;
mod pixel;

// Re-exports
pub use bitmap::{Bitmap, Metadata};
pub use convert::{
    ConversionPlan, ConvertRequest, GAMMA_INV, PackedLayout, Permissiveness, SourceEncoding,
    TOE_END, TOE_SLOPE, convert_to_24bits, encode_channel, try_convert_to_24bits,
};
pub use enough::{Stop, Unstoppable};
pub use error::ConvertError;
pub use limits::Limits;
pub use pixel::{ChannelMasks, PaletteEntry, PixelType};
