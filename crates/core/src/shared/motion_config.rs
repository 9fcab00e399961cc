use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::constants::{DEFAULT_BLOCK_SIZE, DEFAULT_THRESHOLD, MAX_THRESHOLD};
use crate::shared::error::MotionError;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Invalid(#[from] MotionError),
}

/// Tuning knobs for one run: block side length and the averaged
/// per-channel difference a pixel must exceed to mark its block as moving.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionConfig {
    #[serde(default = "default_block_size")]
    pub block_size: u32,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

fn default_block_size() -> u32 {
    DEFAULT_BLOCK_SIZE
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl MotionConfig {
    pub fn new(block_size: u32, threshold: f64) -> Result<Self, MotionError> {
        let config = Self {
            block_size,
            threshold,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), MotionError> {
        validate_parameters(self.block_size, self.threshold)
    }

    /// Loads and validates a JSON config; missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = serde_json::from_str(&json).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }
}

pub(crate) fn validate_parameters(block_size: u32, threshold: f64) -> Result<(), MotionError> {
    if block_size < 1 {
        return Err(MotionError::InvalidConfiguration(format!(
            "block size must be at least 1, got {block_size}"
        )));
    }
    if !(0.0..=MAX_THRESHOLD).contains(&threshold) {
        return Err(MotionError::InvalidConfiguration(format!(
            "threshold must be between 0 and {MAX_THRESHOLD}, got {threshold}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = MotionConfig::default();
        assert_eq!(config.block_size, 10);
        assert_relative_eq!(config.threshold, 30.0);
        assert!(config.validate().is_ok());
    }

    #[rstest]
    #[case::smallest_block(1, 0.0)]
    #[case::max_threshold(16, 255.0)]
    #[case::fractional_threshold(8, 12.5)]
    fn test_accepts_valid_parameters(#[case] block_size: u32, #[case] threshold: f64) {
        assert!(MotionConfig::new(block_size, threshold).is_ok());
    }

    #[rstest]
    #[case::zero_block(0, 30.0)]
    #[case::negative_threshold(10, -0.5)]
    #[case::threshold_too_high(10, 255.5)]
    #[case::nan_threshold(10, f64::NAN)]
    #[case::infinite_threshold(10, f64::INFINITY)]
    fn test_rejects_invalid_parameters(#[case] block_size: u32, #[case] threshold: f64) {
        let err = MotionConfig::new(block_size, threshold).unwrap_err();
        assert!(matches!(err, MotionError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_from_json_file_fills_missing_fields_with_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("motion.json");
        fs::write(&path, r#"{"threshold": 42.0}"#).unwrap();

        let config = MotionConfig::from_json_file(&path).unwrap();
        assert_eq!(config.block_size, 10);
        assert_relative_eq!(config.threshold, 42.0);
    }

    #[test]
    fn test_from_json_file_rejects_invalid_values() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("motion.json");
        fs::write(&path, r#"{"block_size": 0}"#).unwrap();

        let err = MotionConfig::from_json_file(&path).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid(MotionError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_from_json_file_reports_parse_errors() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("motion.json");
        fs::write(&path, "not json").unwrap();

        let err = MotionConfig::from_json_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_from_json_file_missing_file() {
        let err = MotionConfig::from_json_file(Path::new("/nonexistent/motion.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
