//! Reference image preparation.
//!
//! Uploaded character images are normalized before transmission: validated as
//! PNG or JPEG, downscaled to fit the endpoint's input constraints, coerced to
//! RGB, and re-encoded as JPEG. The transform is pure: the same input bytes
//! always yield the same output bytes.

use crate::error::{EduVizError, Result};
use crate::image::types::ImageFormat;
use std::io::Cursor;

/// Maximum width or height of a reference image sent to the API, in pixels.
pub const MAX_DIMENSION: u32 = 1024;

/// Maximum encoded size of a reference image payload, in bytes.
pub const MAX_REFERENCE_BYTES: usize = 4 * 1024 * 1024;

/// A normalized reference image ready for transmission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedReference {
    /// JPEG-encoded image bytes, guaranteed under [`MAX_REFERENCE_BYTES`].
    pub data: Vec<u8>,
    /// Width after normalization.
    pub width: u32,
    /// Height after normalization.
    pub height: u32,
    /// Whether the image had to be downscaled.
    pub downscaled: bool,
}

impl PreparedReference {
    /// The format of the normalized payload. Always JPEG.
    pub fn format(&self) -> ImageFormat {
        ImageFormat::Jpeg
    }
}

/// Normalizes an uploaded image for use as a generation reference.
///
/// Accepts PNG and JPEG uploads only. Images larger than [`MAX_DIMENSION`] on
/// either axis are downscaled preserving aspect ratio; if the JPEG payload
/// still exceeds [`MAX_REFERENCE_BYTES`], dimensions are halved until it fits.
pub fn prepare_reference(bytes: &[u8]) -> Result<PreparedReference> {
    let format = ImageFormat::from_magic_bytes(bytes).ok_or_else(|| {
        EduVizError::InvalidInput("Unsupported upload format; use JPG, JPEG, or PNG.".into())
    })?;

    let wire_format = match format {
        ImageFormat::Png => image::ImageFormat::Png,
        ImageFormat::Jpeg => image::ImageFormat::Jpeg,
    };
    let decoded = image::load_from_memory_with_format(bytes, wire_format).map_err(|e| {
        EduVizError::InvalidInput(format!("Uploaded file could not be decoded: {e}"))
    })?;

    let (orig_w, orig_h) = (decoded.width(), decoded.height());
    let mut img = if orig_w > MAX_DIMENSION || orig_h > MAX_DIMENSION {
        decoded.thumbnail(MAX_DIMENSION, MAX_DIMENSION)
    } else {
        decoded
    };

    let mut data = encode_jpeg(&img)?;
    while data.len() > MAX_REFERENCE_BYTES && img.width() > 1 && img.height() > 1 {
        img = img.thumbnail(img.width() / 2, img.height() / 2);
        data = encode_jpeg(&img)?;
    }

    let downscaled = (img.width(), img.height()) != (orig_w, orig_h);
    if downscaled {
        tracing::debug!(
            from = %format!("{orig_w}x{orig_h}"),
            to = %format!("{}x{}", img.width(), img.height()),
            "reference image downscaled"
        );
    }

    Ok(PreparedReference {
        width: img.width(),
        height: img.height(),
        data,
        downscaled,
    })
}

fn encode_jpeg(img: &image::DynamicImage) -> Result<Vec<u8>> {
    // RGB coercion drops alpha, which JPEG cannot carry anyway
    let rgb = image::DynamicImage::ImageRgb8(img.to_rgb8());
    let mut buf = Cursor::new(Vec::new());
    rgb.write_to(&mut buf, image::ImageFormat::Jpeg)?;
    Ok(buf.into_inner())
}
