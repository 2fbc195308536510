//! Watermarking a directory: argument handling, setup and the batch run.

mod batch;
mod setup;

use clap::Args;
use std::fs::File;
use std::io::BufWriter;

use watermarker_core::config::{DEFAULT_SCALE, DEFAULT_TEXT, DEFAULT_TRANSPARENCY};
use watermarker_core::{Config, ConfigOptions, FileDiscovery, ImageProcessor, Position, RunLog};

use batch::process_batch;
use setup::setup_run;

/// Watermarking options.
///
/// Numeric and position values are taken loosely here and validated by
/// [`Config::resolve`], so bad values surface as configuration errors.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct WatermarkArgs {
    /// Directory containing the images to watermark
    #[arg(long, required = true)]
    pub input_dir: String,

    /// Directory for watermarked images and the run log [default: <input-dir>/watermarked]
    #[arg(long)]
    pub output_dir: Option<String>,

    /// Image to use as the watermark (takes precedence over text)
    #[arg(long)]
    pub logo_path: Option<String>,

    /// Text to render when no logo is given
    #[arg(long, default_value = DEFAULT_TEXT)]
    pub watermark_text: String,

    /// TrueType/OpenType font for text watermarks
    #[arg(long)]
    pub font_path: Option<String>,

    /// Watermark width as a fraction of each image's width
    #[arg(long, default_value_t = DEFAULT_SCALE, allow_hyphen_values = true)]
    pub scale: f32,

    /// Placement: top-left, top-right, bottom-left, bottom-right or center
    #[arg(long, default_value = Position::default().as_str())]
    pub position: String,

    /// Watermark opacity from 0 (invisible) to 255 (opaque)
    #[arg(long, default_value_t = DEFAULT_TRANSPARENCY, allow_hyphen_values = true)]
    pub transparency: i64,
}

/// Manual Default impl for constructing WatermarkArgs outside of clap.
///
/// Values match the clap defaults above.
impl Default for WatermarkArgs {
    fn default() -> Self {
        Self {
            input_dir: String::new(),
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

impl WatermarkArgs {
    /// Raw options for [`Config::resolve`].
    pub fn to_options(&self) -> ConfigOptions {
        ConfigOptions {
            input_dir: self.input_dir.clone(),
            output_dir: self.output_dir.clone(),
            logo_path: self.logo_path.clone(),
            watermark_text: self.watermark_text.clone(),
            font_path: self.font_path.clone(),
            scale: self.scale,
            position: self.position.clone(),
            transparency: self.transparency,
        }
    }
}

/// Everything assembled by setup_run().
pub(crate) struct RunContext {
    pub config: Config,
    pub processor: ImageProcessor,
    pub log: RunLog<BufWriter<File>>,
}

/// Execute a watermarking run.
///
/// Configuration and watermark errors abort with an error. Per-file failures
/// are logged and the run still succeeds.
pub fn execute(args: WatermarkArgs) -> anyhow::Result<()> {
    let ctx = setup_run(&args)?;

    let files = FileDiscovery::new().discover(&ctx.config.input_dir);
    if files.is_empty() {
        tracing::warn!(
            "No supported image files found in {:?}",
            ctx.config.input_dir
        );
    } else {
        tracing::info!(
            "Found {} image(s) to watermark ({:.1} MB)",
            files.len(),
            FileDiscovery::total_size(&files) as f64 / 1_000_000.0
        );
    }

    process_batch(ctx, files)
}
