//! Error types for the watermarking pipeline.
//!
//! Errors are split by how far they reach: configuration and watermark-loading
//! errors abort the run, while per-file errors are recorded and skipped.

use std::path::PathBuf;
use thiserror::Error;

/// Invalid command-line input. Always fatal.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Input directory does not exist
    #[error("Input directory does not exist: {}", .0.display())]
    InputDirMissing(PathBuf),

    /// Input path exists but is not a directory
    #[error("Input path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// Logo file does not exist
    #[error("Logo file not found: {}", .0.display())]
    LogoNotFound(PathBuf),

    /// Logo file exists but cannot be opened
    #[error("Logo file is not readable: {}: {source}", path.display())]
    LogoUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Font file does not exist
    #[error("Font file not found: {}", .0.display())]
    FontNotFound(PathBuf),

    /// Scale must be a finite number greater than zero
    #[error("Invalid scale {0}: must be greater than 0")]
    InvalidScale(f32),

    /// Transparency must fit in 0..=255
    #[error("Invalid transparency {0}: must be between 0 and 255")]
    InvalidTransparency(i64),

    /// Position is not one of the five anchors
    #[error(
        "Unknown position '{0}': expected one of top-left, top-right, bottom-left, bottom-right, center"
    )]
    UnknownPosition(String),

    /// Output directory could not be created
    #[error("Cannot create output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// The shared watermark asset could not be built. Always fatal.
#[derive(Error, Debug)]
pub enum WatermarkLoadError {
    /// Logo image could not be read or decoded
    #[error("Cannot decode watermark image {}: {message}", path.display())]
    Decode { path: PathBuf, message: String },

    /// Explicitly requested font could not be loaded
    #[error("Cannot load font {}: {message}", path.display())]
    Font { path: PathBuf, message: String },

    /// Text renders to no visible pixels
    #[error("Watermark text '{0}' renders no visible glyphs")]
    EmptyText(String),

    /// Decoded watermark has a zero dimension
    #[error("Watermark image {} has no pixels", .0.display())]
    EmptyRaster(PathBuf),
}

/// A single source file could not be watermarked. Recorded and skipped.
#[derive(Error, Debug)]
pub enum FileProcessError {
    /// Reading the source file failed
    #[error("Cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Image decoding failed
    #[error("Decode error for {}: {message}", path.display())]
    Decode { path: PathBuf, message: String },

    /// Format could not be determined or cannot be re-encoded
    #[error("Unsupported format for {}: {format}", path.display())]
    UnsupportedFormat { path: PathBuf, format: String },

    /// The watermark would scale far beyond the image it is applied to
    #[error("Scaled watermark {width}x{height} is too large for {}", path.display())]
    WatermarkTooLarge {
        path: PathBuf,
        width: u32,
        height: u32,
    },

    /// Encoding the watermarked image failed
    #[error("Encode error for {}: {message}", path.display())]
    Encode { path: PathBuf, message: String },

    /// Writing the output file failed
    #[error("Cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
