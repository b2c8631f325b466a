//! Scanner configuration.
//!
//! Settings are plain values with builder-style setters. They can also be read
//! from a small `key = value` text file:
//!
//! ```text
//! # esdemux.toml
//! chunk_size = 65536
//! ```

use std::fs;
use std::path::Path;

use crate::error::{DemuxError, Result};

/// Number of bytes requested from the byte source on each buffer reload.
pub const DEFAULT_CHUNK_SIZE: usize = 500_000;

/// Configuration for [`StartCodeScanner`](crate::format::annexb::StartCodeScanner).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannerConfig {
    /// Bytes read from the source per reload. Must be non-zero.
    pub chunk_size: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl ScannerConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the reload chunk size.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Checks that the configuration can drive a scanner.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(DemuxError::InvalidData("chunk_size must be non-zero".into()));
        }
        Ok(())
    }

    /// Parses `key = value` lines on top of the defaults.
    ///
    /// Blank lines, `#` comments and unknown keys are ignored. Values may be
    /// quoted.
    pub fn from_str_config(content: &str) -> Result<Self> {
        let mut config = Self::default();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim().trim_matches('"').trim_matches('\'');
            match key.trim() {
                "chunk_size" => config.chunk_size = value.replace('_', "").parse()?,
                other => log::debug!("ignoring unknown config key {:?}", other),
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file written in the `key = value` format.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_str_config(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = ScannerConfig::new();
        assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = ScannerConfig::new().with_chunk_size(4096);
        assert_eq!(config, ScannerConfig { chunk_size: 4096 });
        assert!(ScannerConfig::new().with_chunk_size(0).validate().is_err());
    }

    #[test]
    fn test_parse_key_values() {
        let text = "# scanner\n\nchunk_size = \"65_536\"\nunknown = 1\n";
        let config = ScannerConfig::from_str_config(text).unwrap();
        assert_eq!(config.chunk_size, 65_536);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            ScannerConfig::from_str_config("chunk_size = lots"),
            Err(DemuxError::ParseInt(_))
        ));
        assert!(matches!(
            ScannerConfig::from_str_config("chunk_size = 0"),
            Err(DemuxError::InvalidData(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            ScannerConfig::from_file("/nonexistent/esdemux.toml"),
            Err(DemuxError::Io(_))
        ));
    }
}
