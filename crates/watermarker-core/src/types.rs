//! Core data types produced by a watermarking run.

use std::fmt;
use std::path::PathBuf;

/// Result of watermarking a single image.
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    // === File Identification ===
    /// Path of the source file
    pub source: PathBuf,

    /// Path the watermarked copy was written to
    pub output: PathBuf,

    /// Just the filename portion, shared by source and output
    pub file_name: String,

    // === Image Properties ===
    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    /// Detected format ("jpeg", "png", "webp", "bmp")
    pub format: String,

    /// Size of the written file in bytes
    pub bytes_written: u64,
}

/// How a file fared in the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    Success,
    Skipped,
    Error,
}

impl OutcomeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeStatus::Success => "success",
            OutcomeStatus::Skipped => "skipped",
            OutcomeStatus::Error => "error",
        }
    }
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Pad so `{:<7}` lines up statuses in the run log
        f.pad(self.as_str())
    }
}

/// One line of the run log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    /// Source filename
    pub file_name: String,

    /// Outcome of the attempt
    pub status: OutcomeStatus,

    /// Error or skip reason, if any
    pub detail: Option<String>,
}

impl FileOutcome {
    pub fn success(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            status: OutcomeStatus::Success,
            detail: None,
        }
    }

    pub fn skipped(file_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            status: OutcomeStatus::Skipped,
            detail: Some(reason.into()),
        }
    }

    pub fn error(file_name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            status: OutcomeStatus::Error,
            detail: Some(detail.into()),
        }
    }
}

impl fmt::Display for FileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<7} {}", self.status, self.file_name)?;
        if let Some(detail) = &self.detail {
            write!(f, ": {}", detail)?;
        }
        Ok(())
    }
}

/// Counts for a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Supported image files discovered
    pub found: usize,

    /// Files watermarked and written
    pub succeeded: usize,

    /// Files that could not be processed
    pub failed: usize,

    /// Files deliberately left alone
    pub skipped: usize,
}

impl BatchSummary {
    /// Count one outcome.
    pub fn record(&mut self, status: OutcomeStatus) {
        match status {
            OutcomeStatus::Success => self.succeeded += 1,
            OutcomeStatus::Skipped => self.skipped += 1,
            OutcomeStatus::Error => self.failed += 1,
        }
    }

    /// Files that have an outcome so far.
    pub fn attempted(&self) -> usize {
        self.succeeded + self.failed + self.skipped
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Processing complete. Found: {}, Succeeded: {}, Failed: {}, Skipped: {}",
            self.found, self.succeeded, self.failed, self.skipped
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_line_format() {
        assert_eq!(FileOutcome::success("a.png").to_string(), "success a.png");
        assert_eq!(
            FileOutcome::error("bad.jpg", "Decode error").to_string(),
            "error   bad.jpg: Decode error"
        );
        assert_eq!(
            FileOutcome::skipped("c.bmp", "output would overwrite source").to_string(),
            "skipped c.bmp: output would overwrite source"
        );
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = BatchSummary {
            found: 4,
            ..Default::default()
        };
        summary.record(OutcomeStatus::Success);
        summary.record(OutcomeStatus::Success);
        summary.record(OutcomeStatus::Error);
        summary.record(OutcomeStatus::Skipped);

        assert_eq!(summary.attempted(), summary.found);
        assert_eq!(
            summary.to_string(),
            "Processing complete. Found: 4, Succeeded: 2, Failed: 1, Skipped: 1"
        );
    }
}
