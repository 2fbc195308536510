//! The per-file loop: process each discovered file in order and log outcomes.

use std::io::{self, Write};

use crate::config::Config;
use crate::report::RunLog;
use crate::types::{BatchSummary, FileOutcome};

use super::discovery::DiscoveredFile;
use super::processor::ImageProcessor;

/// Skip reason recorded when writing would replace the source file.
pub const SKIP_IN_PLACE: &str = "output would overwrite the source file";

/// Watermark `files` sequentially, recording one outcome per file.
///
/// Per-file failures are logged and the loop continues. Only failures
/// writing the run log itself abort the batch. `on_file` is called after
/// each outcome is recorded, e.g. to advance a progress bar.
pub fn run_batch<W, F>(
    processor: &ImageProcessor,
    config: &Config,
    files: &[DiscoveredFile],
    log: &mut RunLog<W>,
    mut on_file: F,
) -> io::Result<BatchSummary>
where
    W: Write,
    F: FnMut(&FileOutcome),
{
    let in_place = config.writes_in_place();
    let mut summary = BatchSummary {
        found: files.len(),
        ..Default::default()
    };

    for file in files {
        let outcome = if in_place || config.output_path_for(&file.file_name) == file.path {
            FileOutcome::skipped(&file.file_name, SKIP_IN_PLACE)
        } else {
            match processor.process(file) {
                Ok(processed) => {
                    tracing::debug!(
                        "{:?} -> {:?}: {} {}x{}, {} bytes",
                        processed.source,
                        processed.output,
                        processed.format,
                        processed.width,
                        processed.height,
                        processed.bytes_written
                    );
                    FileOutcome::success(&processed.file_name)
                }
                Err(e) => FileOutcome::error(&file.file_name, e.to_string()),
            }
        };

        summary.record(outcome.status);
        log.record(&outcome)?;
        on_file(&outcome);
    }

    log.finish(&summary)?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigOptions;
    use crate::pipeline::{FileDiscovery, WatermarkAsset};
    use crate::types::OutcomeStatus;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    fn asset() -> WatermarkAsset {
        WatermarkAsset::from_image(RgbaImage::from_pixel(8, 4, Rgba([255, 255, 255, 255])))
    }

    #[test]
    fn test_in_place_run_skips_every_file() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("a.png");
        RgbImage::from_pixel(20, 20, Rgb([1, 2, 3])).save(&src).unwrap();
        let before = std::fs::read(&src).unwrap();

        let mut opts = ConfigOptions::new(dir.path().to_string_lossy());
        opts.output_dir = Some(dir.path().to_string_lossy().into_owned());
        let config = Config::resolve(opts).unwrap();
        let files = FileDiscovery::new().discover(&config.input_dir);
        let processor = ImageProcessor::new(&config, asset());

        let mut buf: Vec<u8> = Vec::new();
        let mut seen = Vec::new();
        let summary = {
            let mut log = RunLog::new(&mut buf);
            run_batch(&processor, &config, &files, &mut log, |o| seen.push(o.status)).unwrap()
        };

        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.succeeded, 0);
        assert_eq!(seen, vec![OutcomeStatus::Skipped]);
        assert_eq!(std::fs::read(&src).unwrap(), before);
        assert!(String::from_utf8(buf).unwrap().contains("skipped a.png"));
    }

    #[test]
    fn test_empty_batch_completes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::resolve(ConfigOptions::new(dir.path().to_string_lossy())).unwrap();
        config.ensure_output_dir().unwrap();
        let processor = ImageProcessor::new(&config, asset());

        let mut buf: Vec<u8> = Vec::new();
        let summary = {
            let mut log = RunLog::new(&mut buf);
            run_batch(&processor, &config, &[], &mut log, |_| {}).unwrap()
        };

        assert_eq!(summary, BatchSummary::default());
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Processing complete. Found: 0, Succeeded: 0, Failed: 0, Skipped: 0\n"
        );
    }
}
