//! Watermarking pipeline components.
//!
//! This module contains all the stages of the watermarking pipeline:
//! - **discovery**: Find image files in the input directory
//! - **asset**: Build the shared watermark from a logo or text
//! - **text** / **bitmap_font**: Render text watermarks
//! - **decode**: Load and decode images with format detection
//! - **position**: Anchor and clamp the watermark placement
//! - **compositor**: Scale, fade and blend the watermark
//! - **encode**: Restore colour mode and re-encode
//! - **processor**: Orchestrates one file end to end
//! - **batch**: The sequential per-file loop

pub mod asset;
pub mod batch;
pub mod bitmap_font;
pub mod compositor;
pub mod decode;
pub mod discovery;
pub mod encode;
pub mod position;
pub mod processor;
pub mod text;

// Re-exports for convenient access
pub use asset::WatermarkAsset;
pub use batch::run_batch;
pub use compositor::CompositeOptions;
pub use decode::{DecodedImage, ImageDecoder};
pub use discovery::{DiscoveredFile, FileDiscovery};
pub use position::{Dimensions, Placement};
pub use processor::ImageProcessor;
