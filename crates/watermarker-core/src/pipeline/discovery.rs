//! File discovery for finding images in the input directory.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions accepted as watermark targets (compared case-insensitively).
pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "webp"];

/// Discovers image files directly inside a directory.
#[derive(Debug, Clone, Default)]
pub struct FileDiscovery;

/// Information about a discovered file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    /// Full path to the file
    pub path: PathBuf,
    /// Just the filename portion, reused for the output file
    pub file_name: String,
    /// File size in bytes
    pub size: u64,
}

impl FileDiscovery {
    /// Create a new file discovery instance.
    pub fn new() -> Self {
        Self
    }

    /// Discover supported image files in `dir`.
    ///
    /// Only direct children are considered; subdirectories are not entered.
    /// Files are returned sorted by case-folded name so runs over the same
    /// directory always visit files in the same order. Calling this again
    /// re-reads the directory.
    pub fn discover(&self, dir: &Path) -> Vec<DiscoveredFile> {
        let mut files: Vec<DiscoveredFile> = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|entry| entry.file_type().is_file() && Self::is_supported(entry.path()))
            .filter_map(|entry| {
                let file_name = entry.file_name().to_str()?.to_string();
                let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
                Some(DiscoveredFile {
                    path: entry.into_path(),
                    file_name,
                    size,
                })
            })
            .collect();

        files.sort_by(|a, b| {
            a.file_name
                .to_lowercase()
                .cmp(&b.file_name.to_lowercase())
                .then_with(|| a.file_name.cmp(&b.file_name))
        });
        tracing::debug!("Discovered {} image(s) in {:?}", files.len(), dir);
        files
    }

    /// Check if a file has a supported extension.
    pub fn is_supported(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                SUPPORTED_EXTENSIONS
                    .iter()
                    .any(|supported| supported.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }

    /// Get total size of all discovered files.
    pub fn total_size(files: &[DiscoveredFile]) -> u64 {
        files.iter().map(|f| f.size).sum()
    }
}
