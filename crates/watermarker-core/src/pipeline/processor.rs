//! Pipeline orchestration - watermarks a single image end to end.

use image::DynamicImage;
use std::path::PathBuf;

use crate::config::Config;
use crate::error::FileProcessError;
use crate::types::ProcessedImage;

use super::asset::WatermarkAsset;
use super::compositor::{composite, CompositeOptions};
use super::decode::{format_to_string, ImageDecoder};
use super::discovery::DiscoveredFile;
use super::encode::{is_high_depth, restore_color, write_image};

/// Applies one shared watermark to individual images.
pub struct ImageProcessor {
    decoder: ImageDecoder,
    watermark: WatermarkAsset,
    options: CompositeOptions,
    output_dir: PathBuf,
}

impl ImageProcessor {
    /// Create a processor for `config` using an already-loaded watermark.
    pub fn new(config: &Config, watermark: WatermarkAsset) -> Self {
        Self {
            decoder: ImageDecoder::new(),
            watermark,
            options: CompositeOptions {
                scale: config.scale,
                position: config.position,
                transparency: config.transparency,
                margin: config.margin,
            },
            output_dir: config.output_dir.clone(),
        }
    }

    /// Decode, watermark, re-encode and write one file.
    ///
    /// The output keeps the source filename and format. Nothing is written
    /// if any earlier stage fails.
    pub fn process(&self, file: &DiscoveredFile) -> Result<ProcessedImage, FileProcessError> {
        let start = std::time::Instant::now();
        tracing::debug!("Processing: {:?}", file.path);

        let decoded = self.decoder.decode(&file.path)?;
        tracing::trace!("  Decode: {:?}", start.elapsed());

        // 16-bit sources are blended at 16 bits so untouched pixels survive exactly
        let working = if is_high_depth(decoded.color) {
            let mut canvas = decoded.image.to_rgba16();
            composite(&mut canvas, self.watermark.image(), &self.options, &file.path)?;
            DynamicImage::ImageRgba16(canvas)
        } else {
            let mut canvas = decoded.image.to_rgba8();
            composite(&mut canvas, self.watermark.image(), &self.options, &file.path)?;
            DynamicImage::ImageRgba8(canvas)
        };
        let restored = restore_color(working, decoded.color, decoded.format);

        let output = self.output_dir.join(&file.file_name);
        let bytes_written = write_image(&restored, decoded.format, &output)?;

        tracing::debug!(
            "Watermarked {:?} in {:?} ({}x{})",
            file.file_name,
            start.elapsed(),
            decoded.width,
            decoded.height
        );

        Ok(ProcessedImage {
            source: file.path.clone(),
            output,
            file_name: file.file_name.clone(),
            width: decoded.width,
            height: decoded.height,
            format: format_to_string(decoded.format),
            bytes_written,
        })
    }
}
