//! The shared watermark raster, built once per run.

use image::RgbaImage;
use std::path::Path;

use super::text::render_text;
use crate::config::WatermarkSource;
use crate::error::WatermarkLoadError;

/// Immutable RGBA watermark shared by every file in a batch.
///
/// Each file works on its own scaled copy; this raster is never modified.
#[derive(Debug, Clone)]
pub struct WatermarkAsset {
    image: RgbaImage,
}

impl WatermarkAsset {
    /// Build the watermark from a logo file or from text.
    pub fn load(source: &WatermarkSource) -> Result<Self, WatermarkLoadError> {
        let image = match source {
            WatermarkSource::Image { path } => load_logo(path)?,
            WatermarkSource::Text { text, font } => render_text(text, font.as_deref())?,
        };
        tracing::info!(
            "Loaded {} watermark ({}x{})",
            source.kind(),
            image.width(),
            image.height()
        );
        Ok(Self { image })
    }

    /// Wrap an existing raster.
    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

/// Decode a logo, detecting its format from content, and convert to RGBA.
fn load_logo(path: &Path) -> Result<RgbaImage, WatermarkLoadError> {
    let decode_err = |message: String| WatermarkLoadError::Decode {
        path: path.to_path_buf(),
        message,
    };
    let image = image::ImageReader::open(path)
        .map_err(|e| decode_err(e.to_string()))?
        .with_guessed_format()
        .map_err(|e| decode_err(e.to_string()))?
        .decode()
        .map_err(|e| decode_err(e.to_string()))?;

    if image.width() == 0 || image.height() == 0 {
        return Err(WatermarkLoadError::EmptyRaster(path.to_path_buf()));
    }
    Ok(image.to_rgba8())
}
