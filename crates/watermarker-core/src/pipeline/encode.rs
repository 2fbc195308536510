//! Re-encoding watermarked images in their original format.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::webp::WebPEncoder;
use image::{ColorType, DynamicImage, ImageFormat};
use std::io::Cursor;
use std::path::Path;

use crate::error::FileProcessError;

/// JPEG quality used for every re-encoded JPEG.
pub const JPEG_QUALITY: u8 = 95;

/// Whether the output format can carry an alpha channel.
///
/// BMP technically can, but most viewers ignore it, so it is flattened.
pub fn supports_alpha(format: ImageFormat) -> bool {
    matches!(format, ImageFormat::Png | ImageFormat::WebP)
}

/// Whether a colour type stores more than 8 bits per channel.
pub fn is_high_depth(color: ColorType) -> bool {
    color.bytes_per_pixel() / color.channel_count() > 1
}

/// Convert the RGBA working image back to the source colour mode.
///
/// Alpha survives only if the source had it and the format can store it.
/// 16-bit depth survives only for PNG.
pub fn restore_color(
    working: DynamicImage,
    original: ColorType,
    format: ImageFormat,
) -> DynamicImage {
    let keep_alpha = original.has_alpha() && supports_alpha(format);
    let grayscale = !original.has_color();
    let wide = is_high_depth(original) && format == ImageFormat::Png;

    match (grayscale, keep_alpha, wide) {
        (true, true, true) => DynamicImage::ImageLumaA16(working.to_luma_alpha16()),
        (true, false, true) => DynamicImage::ImageLuma16(working.to_luma16()),
        (true, true, false) => DynamicImage::ImageLumaA8(working.to_luma_alpha8()),
        (true, false, false) => DynamicImage::ImageLuma8(working.to_luma8()),
        (false, true, true) => DynamicImage::ImageRgba16(working.to_rgba16()),
        (false, false, true) => DynamicImage::ImageRgb16(working.to_rgb16()),
        (false, true, false) => DynamicImage::ImageRgba8(working.to_rgba8()),
        (false, false, false) => DynamicImage::ImageRgb8(working.to_rgb8()),
    }
}

/// Encode an image into `format` with format-appropriate defaults.
pub fn encode(
    image: &DynamicImage,
    format: ImageFormat,
    path: &Path,
) -> Result<Vec<u8>, FileProcessError> {
    let mut buffer = Cursor::new(Vec::new());
    let encode_err = |e: image::ImageError| FileProcessError::Encode {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    match format {
        ImageFormat::Jpeg => {
            let encoder = JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY);
            image.write_with_encoder(encoder).map_err(encode_err)?;
        }
        ImageFormat::WebP => {
            // The pure-Rust WebP encoder only writes lossless images
            let encoder = WebPEncoder::new_lossless(&mut buffer);
            image.write_with_encoder(encoder).map_err(encode_err)?;
        }
        ImageFormat::Png | ImageFormat::Bmp => {
            image.write_to(&mut buffer, format).map_err(encode_err)?;
        }
        other => {
            return Err(FileProcessError::UnsupportedFormat {
                path: path.to_path_buf(),
                format: format!("{:?}", other),
            })
        }
    }

    Ok(buffer.into_inner())
}

/// Encode and write the image to `path`.
pub fn write_image(
    image: &DynamicImage,
    format: ImageFormat,
    path: &Path,
) -> Result<u64, FileProcessError> {
    let bytes = encode(image, format, path)?;
    std::fs::write(path, &bytes).map_err(|source| FileProcessError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(bytes.len() as u64)
}
