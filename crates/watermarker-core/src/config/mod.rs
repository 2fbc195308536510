//! Configuration resolution for a watermarking run.
//!
//! Raw command-line values arrive as [`ConfigOptions`]; [`Config::resolve`]
//! cleans the paths, picks the watermark kind and validates every range.
//! The resulting [`Config`] is read-only for the rest of the run.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use std::path::{Path, PathBuf};

/// Validated settings for one batch.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory scanned for source images
    pub input_dir: PathBuf,

    /// Directory receiving watermarked images and the run log
    pub output_dir: PathBuf,

    /// Image or text watermark
    pub source: WatermarkSource,

    /// Watermark width as a fraction of the base image width
    pub scale: f32,

    /// Anchor used for placement
    pub position: Position,

    /// Watermark opacity, 0 (invisible) to 255 (opaque)
    pub transparency: u8,

    /// Inset from the edges for corner anchors
    pub margin: u32,
}

impl Config {
    /// Build a validated configuration from raw options.
    ///
    /// A logo path takes precedence over watermark text when both are given.
    /// Does not touch the filesystem beyond existence checks; call
    /// [`Config::ensure_output_dir`] to create the output directory.
    pub fn resolve(options: ConfigOptions) -> Result<Self, ConfigError> {
        let input_dir = clean_path(&options.input_dir);
        let output_dir = match options.output_dir.as_deref().map(str::trim) {
            Some(dir) if !dir.is_empty() => clean_path(dir),
            _ => input_dir.join(DEFAULT_OUTPUT_SUBDIR),
        };

        let logo = options
            .logo_path
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .map(clean_path);
        let source = match logo {
            Some(path) => WatermarkSource::Image { path },
            None => WatermarkSource::Text {
                text: options.watermark_text,
                font: options
                    .font_path
                    .as_deref()
                    .filter(|p| !p.trim().is_empty())
                    .map(clean_path),
            },
        };

        let position = options.position.parse::<Position>()?;
        let transparency = u8::try_from(options.transparency)
            .map_err(|_| ConfigError::InvalidTransparency(options.transparency))?;

        let config = Self {
            input_dir,
            output_dir,
            source,
            scale: options.scale,
            position,
            transparency,
            margin: DEFAULT_MARGIN,
        };
        config.validate()?;
        tracing::debug!(?config, "Configuration resolved");
        Ok(config)
    }

    /// Create the output directory if it does not exist yet.
    pub fn ensure_output_dir(&self) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&self.output_dir).map_err(|source| ConfigError::OutputDir {
            path: self.output_dir.clone(),
            source,
        })
    }

    /// Where the watermarked copy of `file_name` is written.
    pub fn output_path_for(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }

    /// True when output files would land in the input directory itself.
    pub fn writes_in_place(&self) -> bool {
        same_dir(&self.input_dir, &self.output_dir)
    }
}

/// Normalize a user-supplied path: trim, drop embedded line breaks, expand `~`.
pub fn clean_path(raw: &str) -> PathBuf {
    let cleaned: String = raw.trim().chars().filter(|c| *c != '\n' && *c != '\r').collect();
    let expanded = shellexpand::tilde(&cleaned);
    PathBuf::from(expanded.into_owned())
}

fn same_dir(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
