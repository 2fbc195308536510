//! Run setup: configuration, output directory, run log and watermark asset.

use watermarker_core::{Config, ImageProcessor, RunLog, WatermarkAsset};

use super::{RunContext, WatermarkArgs};

/// Validate arguments and assemble everything needed for the batch.
///
/// The run log is opened before the watermark is loaded so that a
/// watermark failure is recorded in it.
pub fn setup_run(args: &WatermarkArgs) -> anyhow::Result<RunContext> {
    let config = Config::resolve(args.to_options())?;
    config.ensure_output_dir()?;

    if config.writes_in_place() {
        tracing::warn!(
            "Output directory is the input directory; existing images will not be overwritten"
        );
    }

    let mut log = RunLog::create(&config.output_dir)?;
    log.header(&config)?;

    let watermark = match WatermarkAsset::load(&config.source) {
        Ok(watermark) => watermark,
        Err(e) => {
            log.fatal(&e)?;
            return Err(e.into());
        }
    };

    let processor = ImageProcessor::new(&config, watermark);

    Ok(RunContext {
        config,
        processor,
        log,
    })
}
