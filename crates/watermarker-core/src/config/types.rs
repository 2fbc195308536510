//! Sub-configuration types: anchor positions, watermark sources, raw options.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::ConfigError;

/// Default watermark text when no logo is given.
pub const DEFAULT_TEXT: &str = "Watermark";

/// Default watermark width as a fraction of the base image width.
pub const DEFAULT_SCALE: f32 = 0.1;

/// Default watermark opacity (0 = invisible, 255 = opaque).
pub const DEFAULT_TRANSPARENCY: i64 = 128;

/// Inset in pixels kept between the watermark and the image edge.
pub const DEFAULT_MARGIN: u32 = 10;

/// Name of the output subdirectory used when none is given.
pub const DEFAULT_OUTPUT_SUBDIR: &str = "watermarked";

/// Where the watermark is anchored on the base image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    TopLeft,
    #[default]
    TopRight,
    BottomLeft,
    BottomRight,
    Center,
}

impl Position {
    /// All anchors, in the order they are documented.
    pub const ALL: [Position; 5] = [
        Position::TopLeft,
        Position::TopRight,
        Position::BottomLeft,
        Position::BottomRight,
        Position::Center,
    ];

    /// The flag spelling of this anchor.
    pub fn as_str(&self) -> &'static str {
        match self {
            Position::TopLeft => "top-left",
            Position::TopRight => "top-right",
            Position::BottomLeft => "bottom-left",
            Position::BottomRight => "bottom-right",
            Position::Center => "center",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Position::ALL
            .into_iter()
            .find(|p| p.as_str() == normalized)
            .ok_or_else(|| ConfigError::UnknownPosition(s.to_string()))
    }
}

/// Which kind of watermark is applied. Decided once during resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatermarkSource {
    /// Decode a logo file.
    Image { path: PathBuf },
    /// Render text, optionally with an explicit font file.
    Text { text: String, font: Option<PathBuf> },
}

impl WatermarkSource {
    /// Short label for log headers.
    pub fn kind(&self) -> &'static str {
        match self {
            WatermarkSource::Image { .. } => "image",
            WatermarkSource::Text { .. } => "text",
        }
    }
}

impl fmt::Display for WatermarkSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WatermarkSource::Image { path } => write!(f, "image {}", path.display()),
            WatermarkSource::Text { text, .. } => write!(f, "text \"{}\"", text),
        }
    }
}

/// Raw, unvalidated options as they arrive from the command line.
///
/// Paths are kept as strings so stray whitespace and newlines from
/// copy-pasted arguments can be cleaned before use.
#[derive(Debug, Clone)]
pub struct ConfigOptions {
    pub input_dir: String,
    pub output_dir: Option<String>,
    pub logo_path: Option<String>,
    pub watermark_text: String,
    pub font_path: Option<String>,
    pub scale: f32,
    pub position: String,
    pub transparency: i64,
}

impl ConfigOptions {
    /// Options for `input_dir` with every other value at its default.
    pub fn new(input_dir: impl Into<String>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: None,
            logo_path: None,
            watermark_text: DEFAULT_TEXT.to_string(),
            font_path: None,
            scale: DEFAULT_SCALE,
            position: Position::default().to_string(),
            transparency: DEFAULT_TRANSPARENCY,
        }
    }
}
