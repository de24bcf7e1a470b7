use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Default similarity threshold
pub const DEFAULT_THRESHOLD: f64 = 0.9;

/// Lowest accepted similarity threshold
pub const MIN_THRESHOLD: f64 = 0.1;

/// Highest accepted similarity threshold
pub const MAX_THRESHOLD: f64 = 1.0;

/// Default largest dimension of the comparison preview
pub const DEFAULT_LARGEST_DIMENSION: u32 = 1000;

/// Smallest accepted largest dimension of the comparison preview
pub const MIN_LARGEST_DIMENSION: u32 = 250;

/// Log level for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Configuration for a scan and the review session that follows it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Minimum fraction of identical samples for two images to be duplicates
    pub threshold: f64,

    /// Whether to descend into subdirectories of the root
    pub recursive: bool,

    /// Largest dimension of the comparison preview, in pixels
    pub largest_dimension: u32,

    /// Directory for rotated log files (platform cache directory if unset)
    pub log_dir: Option<PathBuf>,

    /// Log level
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            recursive: false,
            largest_dimension: DEFAULT_LARGEST_DIMENSION,
            log_dir: None,
            log_level: LogLevel::Info,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .map_err(|e| Error::Configuration(format!("Failed to open config file: {}", e)))?;

        let config: Config = serde_json::from_reader(file)
            .map_err(|e| Error::Configuration(format!("Failed to parse config file: {}", e)))?;

        Ok(config)
    }

    /// Save configuration to a file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .map_err(|e| Error::Configuration(format!("Failed to create config file: {}", e)))?;

        serde_json::to_writer_pretty(file, self)
            .map_err(|e| Error::Configuration(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Validate the configuration
    ///
    /// Out-of-range values are not errors, they are clamped by [`Config::normalized`].
    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() {
            return Err(Error::Configuration(
                "Similarity threshold must be a finite number".to_string(),
            ));
        }

        Ok(())
    }

    /// Copy of the configuration with threshold and preview size clamped to their ranges
    pub fn normalized(&self) -> Self {
        Self {
            threshold: clamp_threshold(self.threshold),
            largest_dimension: clamp_largest_dimension(i64::from(self.largest_dimension)),
            ..self.clone()
        }
    }

    /// Directory log files are written to
    pub fn resolved_log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("pixel-deduper")
                .join("logs")
        })
    }
}

/// Clamp a similarity threshold into `[MIN_THRESHOLD, MAX_THRESHOLD]`
pub fn clamp_threshold(threshold: f64) -> f64 {
    threshold.clamp(MIN_THRESHOLD, MAX_THRESHOLD)
}

/// Clamp a requested preview size to at least `MIN_LARGEST_DIMENSION`
pub fn clamp_largest_dimension(requested: i64) -> u32 {
    let clamped = requested.max(i64::from(MIN_LARGEST_DIMENSION));
    u32::try_from(clamped).unwrap_or(u32::MAX)
}
