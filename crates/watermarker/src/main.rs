//! Watermarker CLI - stamp a logo or a line of text onto every image in a directory.
//!
//! Supported images (PNG, JPEG, BMP, WebP) directly inside the input directory
//! are watermarked and written, under their original names and formats, to
//! the output directory together with a run log.
//!
//! # Usage
//!
//! ```bash
//! # Text watermark with defaults (top-right, 10% width, half opacity)
//! watermarker --input-dir ./photos
//!
//! # Logo in the bottom-right corner, written elsewhere
//! watermarker --input-dir ./photos --output-dir ./out \
//!     --logo-path logo.png --position bottom-right --scale 0.2
//!
//! # Opaque text with a specific font
//! watermarker --input-dir ./photos --watermark-text "© 2024" \
//!     --font-path ./fonts/Inter.ttf --transparency 255
//! ```

use clap::Parser;

mod cli;
mod logging;

/// Watermarker - overlay an image or text watermark onto a directory of images.
#[derive(Parser, Debug)]
#[command(name = "watermarker")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long)]
    json_logs: bool,

    #[command(flatten)]
    args: cli::WatermarkArgs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose, cli.json_logs);

    tracing::debug!("Watermarker v{}", watermarker_core::VERSION);

    cli::execute(cli.args)
}
