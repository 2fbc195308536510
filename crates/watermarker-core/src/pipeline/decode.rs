//! Image decoding with content-based format detection.

use image::{ColorType, DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;
use std::path::Path;

use crate::error::FileProcessError;

/// Decodes source images from disk.
#[derive(Debug, Clone, Default)]
pub struct ImageDecoder;

/// Result of decoding an image.
pub struct DecodedImage {
    /// The decoded image data
    pub image: DynamicImage,
    /// Detected image format, reused when re-encoding
    pub format: ImageFormat,
    /// Colour mode before any conversion
    pub color: ColorType,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

impl ImageDecoder {
    /// Create a new decoder.
    pub fn new() -> Self {
        Self
    }

    /// Read and decode an image file.
    pub fn decode(&self, path: &Path) -> Result<DecodedImage, FileProcessError> {
        let bytes = std::fs::read(path).map_err(|source| FileProcessError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::decode_bytes(bytes, path)
    }

    /// Decode an in-memory buffer, guessing the format from its content first
    /// and from the file extension second.
    pub fn decode_bytes(bytes: Vec<u8>, path: &Path) -> Result<DecodedImage, FileProcessError> {
        let mut reader = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| FileProcessError::Decode {
                path: path.to_path_buf(),
                message: format!("Cannot detect image format: {}", e),
            })?;
        let format = match reader.format() {
            Some(f) => f,
            None => ImageFormat::from_path(path).map_err(|_| {
                FileProcessError::UnsupportedFormat {
                    path: path.to_path_buf(),
                    format: path
                        .extension()
                        .and_then(|e| e.to_str())
                        .unwrap_or("unknown")
                        .to_string(),
                }
            })?,
        };
        reader.set_format(format);
        let image = reader.decode().map_err(|e| FileProcessError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let (width, height) = image.dimensions();
        Ok(DecodedImage {
            color: image.color(),
            image,
            format,
            width,
            height,
        })
    }
}

/// Convert an ImageFormat to a string representation.
pub fn format_to_string(format: ImageFormat) -> String {
    match format {
        ImageFormat::Jpeg => "jpeg".to_string(),
        ImageFormat::Png => "png".to_string(),
        ImageFormat::WebP => "webp".to_string(),
        ImageFormat::Bmp => "bmp".to_string(),
        _ => "unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn encode_png(img: &RgbImage) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_format_to_string() {
        assert_eq!(format_to_string(ImageFormat::Jpeg), "jpeg");
        assert_eq!(format_to_string(ImageFormat::Png), "png");
        assert_eq!(format_to_string(ImageFormat::WebP), "webp");
        assert_eq!(format_to_string(ImageFormat::Bmp), "bmp");
    }

    #[test]
    fn test_format_detected_by_content() {
        // PNG bytes behind a .jpg name are still decoded as PNG
        let bytes = encode_png(&RgbImage::from_pixel(4, 3, Rgb([1, 2, 3])));
        let decoded = ImageDecoder::decode_bytes(bytes, Path::new("misnamed.jpg")).unwrap();
        assert_eq!(decoded.format, ImageFormat::Png);
        assert_eq!((decoded.width, decoded.height), (4, 3));
        assert_eq!(decoded.color, ColorType::Rgb8);
    }

    #[test]
    fn test_garbage_is_a_decode_error() {
        let result = ImageDecoder::decode_bytes(b"not an image".to_vec(), Path::new("x.png"));
        assert!(matches!(result, Err(FileProcessError::Decode { .. })));
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = ImageDecoder::new().decode(&dir.path().join("gone.png"));
        assert!(matches!(result, Err(FileProcessError::Read { .. })));
    }
}
