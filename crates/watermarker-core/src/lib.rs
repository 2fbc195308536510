//! Watermarker Core - batch image watermarking library.
//!
//! Overlays a logo or rendered text onto every supported image in a
//! directory and writes the results, plus a run log, to an output directory.
//!
//! # Architecture
//!
//! ```text
//! Config → Discover → Load watermark → for each file:
//!     Decode → Scale → Fade → Place → Blend → Encode → Write → Log
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use watermarker_core::{run_batch, Config, ConfigOptions, FileDiscovery, ImageProcessor, RunLog, WatermarkAsset};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::resolve(ConfigOptions::new("./photos"))?;
//!     config.ensure_output_dir()?;
//!
//!     let mut log = RunLog::create(&config.output_dir)?;
//!     let asset = WatermarkAsset::load(&config.source)?;
//!     let files = FileDiscovery::new().discover(&config.input_dir);
//!
//!     let processor = ImageProcessor::new(&config, asset);
//!     let summary = run_batch(&processor, &config, &files, &mut log, |_| {})?;
//!     println!("{summary}");
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod types;

// Re-exports for convenient access
pub use config::{Config, ConfigOptions, Position, WatermarkSource};
pub use error::{ConfigError, FileProcessError, WatermarkLoadError};
pub use pipeline::{run_batch, DiscoveredFile, FileDiscovery, ImageProcessor, WatermarkAsset};
pub use report::RunLog;
pub use types::{BatchSummary, FileOutcome, OutcomeStatus, ProcessedImage};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
