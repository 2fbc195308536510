//! Per-run log file.
//!
//! One log is written per run into the output directory. Every line is also
//! mirrored to the console through `tracing`. The log body carries no
//! timestamps, so identical runs produce identical logs apart from the file
//! name.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::types::{BatchSummary, FileOutcome, OutcomeStatus};

/// Prefix of every run log file name.
pub const LOG_FILE_PREFIX: &str = "watermark_log_";

/// Line-oriented run log over any writer.
pub struct RunLog<W: Write> {
    writer: W,
    path: Option<PathBuf>,
}

impl RunLog<BufWriter<File>> {
    /// Open `<output_dir>/watermark_log_<YYYYmmdd_HHMMSS>.log`.
    pub fn create(output_dir: &Path) -> io::Result<Self> {
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let path = output_dir.join(format!("{}{}.log", LOG_FILE_PREFIX, stamp));
        let file = File::create(&path)?;
        tracing::debug!("Writing run log to {:?}", path);
        Ok(Self {
            writer: BufWriter::new(file),
            path: Some(path),
        })
    }
}

impl<W: Write> RunLog<W> {
    /// Log into an arbitrary writer.
    pub fn new(writer: W) -> Self {
        Self { writer, path: None }
    }

    /// Location of the log file, when backed by one.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Write the run parameters.
    pub fn header(&mut self, config: &Config) -> io::Result<()> {
        writeln!(self.writer, "Watermark run")?;
        writeln!(self.writer, "Input directory: {}", config.input_dir.display())?;
        writeln!(self.writer, "Output directory: {}", config.output_dir.display())?;
        writeln!(self.writer, "Watermark: {}", config.source)?;
        writeln!(self.writer, "Scale: {}", config.scale)?;
        writeln!(self.writer, "Position: {}", config.position)?;
        writeln!(self.writer, "Transparency: {}", config.transparency)?;
        writeln!(self.writer, "Margin: {}", config.margin)?;
        writeln!(self.writer)
    }

    /// Append one per-file outcome.
    pub fn record(&mut self, outcome: &FileOutcome) -> io::Result<()> {
        match outcome.status {
            OutcomeStatus::Success => tracing::info!("{}", outcome),
            OutcomeStatus::Skipped => tracing::warn!("{}", outcome),
            OutcomeStatus::Error => tracing::error!("{}", outcome),
        }
        writeln!(self.writer, "{}", outcome)
    }

    /// Record an error that aborted the run.
    pub fn fatal(&mut self, err: &dyn std::error::Error) -> io::Result<()> {
        tracing::error!("{}", err);
        writeln!(self.writer, "{:<7} {}", "fatal", err)?;
        self.writer.flush()
    }

    /// Write the summary line and flush.
    pub fn finish(&mut self, summary: &BatchSummary) -> io::Result<()> {
        tracing::info!("{}", summary);
        writeln!(self.writer, "{}", summary)?;
        self.writer.flush()
    }
}

impl<W: Write> Drop for RunLog<W> {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}
