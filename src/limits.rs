use alloc::format;

use crate::ConvertError;

/// Caps on the bitmap a conversion may produce.
///
/// Checked before the destination (or the 24-bit duplicate) is allocated, so an
/// oversized request fails without touching memory. All fields default to `None`.
#[derive(Clone, Debug, Default)]
pub struct Limits {
    pub max_width: Option<u64>,
    pub max_height: Option<u64>,
    /// Maximum width * height of the destination.
    pub max_pixels: Option<u64>,
    /// Maximum size of the destination pixel buffer, row padding included.
    pub max_memory_bytes: Option<u64>,
}

impl Limits {
    pub(crate) fn check(&self, width: u32, height: u32) -> Result<(), ConvertError> {
        let pixels = u64::from(width) * u64::from(height);
        exceeds("width", u64::from(width), self.max_width)?;
        exceeds("height", u64::from(height), self.max_height)?;
        exceeds("pixel count", pixels, self.max_pixels)
    }

    pub(crate) fn check_memory(&self, bytes: usize) -> Result<(), ConvertError> {
        exceeds("buffer size in bytes", bytes as u64, self.max_memory_bytes)
    }
}

fn exceeds(what: &str, value: u64, max: Option<u64>) -> Result<(), ConvertError> {
    match max {
        Some(max) if value > max => Err(ConvertError::LimitExceeded(format!(
            "destination {what} {value} exceeds limit {max}"
        ))),
        _ => Ok(()),
    }
}
