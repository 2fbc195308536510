//! Configuration validation with range and path checks.

use crate::error::ConfigError;

use super::{Config, WatermarkSource};

impl Config {
    /// Validate paths and values are usable before any processing starts.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !self.input_dir.exists() {
            return Err(ConfigError::InputDirMissing(self.input_dir.clone()));
        }
        if !self.input_dir.is_dir() {
            return Err(ConfigError::NotADirectory(self.input_dir.clone()));
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(ConfigError::InvalidScale(self.scale));
        }

        match &self.source {
            WatermarkSource::Image { path } => {
                if !path.is_file() {
                    return Err(ConfigError::LogoNotFound(path.clone()));
                }
                std::fs::File::open(path).map_err(|source| ConfigError::LogoUnreadable {
                    path: path.clone(),
                    source,
                })?;
            }
            WatermarkSource::Text {
                font: Some(font), ..
            } => {
                if !font.is_file() {
                    return Err(ConfigError::FontNotFound(font.clone()));
                }
            }
            WatermarkSource::Text { font: None, .. } => {}
        }

        Ok(())
    }
}
