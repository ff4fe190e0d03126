//! Analysis configuration.

use std::ops::Range;
use std::path::Path;

use serde::{Deserialize, Serialize};

use legday_core::{Error, Result, TrailingBytes};

use crate::summary::{DEFAULT_HISTOGRAM_OFFSET, DEFAULT_HISTOGRAM_WIDTH, DEFAULT_WARMUP_WORDS};
use crate::sweep::SweepConfig;

/// Widest context accepted from a configuration.
///
/// Each sweep worker holds three dense tables of `2^bins` entries.
pub const MAX_BINS: u32 = 24;

/// Analysis configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Context width in bits
    #[serde(default = "default_bins")]
    pub bins: u32,

    /// First swept skip (inclusive)
    #[serde(default)]
    pub skip_start: u32,

    /// Last swept skip (exclusive)
    #[serde(default = "default_skip_end")]
    pub skip_end: u32,

    /// Leading words used for training; whole stream when unset
    #[serde(default)]
    pub train_len: Option<usize>,

    /// Whiten with the running XOR before gathering statistics
    #[serde(default)]
    pub xor_transform: bool,

    /// Policy for a trailing partial word
    #[serde(default)]
    pub trailing_bytes: TrailingBytes,

    /// Sweep worker threads
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Words skipped before counting previous-word flips
    #[serde(default = "default_warmup_words")]
    pub warmup_words: usize,

    /// Low bit of the summary histogram window
    #[serde(default = "default_histogram_offset")]
    pub histogram_offset: u32,

    /// Width of the summary histogram window
    #[serde(default = "default_histogram_width")]
    pub histogram_width: u32,

    /// Bits covered by the pairwise flip matrix
    #[serde(default = "default_correlation_bits")]
    pub correlation_bits: u32,

    /// Words scanned for the pairwise flip matrix (clamped to the stream)
    #[serde(default = "default_correlation_len")]
    pub correlation_len: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            bins: default_bins(),
            skip_start: 0,
            skip_end: default_skip_end(),
            train_len: None,
            xor_transform: false,
            trailing_bytes: TrailingBytes::default(),
            workers: default_workers(),
            warmup_words: default_warmup_words(),
            histogram_offset: default_histogram_offset(),
            histogram_width: default_histogram_width(),
            correlation_bits: default_correlation_bits(),
            correlation_len: default_correlation_len(),
        }
    }
}

impl AnalysisConfig {
    /// Load a TOML configuration file. Missing keys take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::read(path, e))?;
        Self::from_toml(&text)
    }

    /// Parse TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| Error::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no sweep could run with.
    ///
    /// Individual skips that push the window past the word are not errors
    /// here; the sweep rejects them one by one.
    pub fn validate(&self) -> Result<()> {
        if self.bins == 0 {
            return Err(Error::config("bins must be at least 1"));
        }
        if self.bins > MAX_BINS {
            return Err(Error::config(format!(
                "bins {} exceeds the maximum of {}",
                self.bins, MAX_BINS
            )));
        }
        if self.skip_start > self.skip_end {
            return Err(Error::config(format!(
                "skip_start {} is past skip_end {}",
                self.skip_start, self.skip_end
            )));
        }
        if self.workers == 0 {
            return Err(Error::config("workers must be at least 1"));
        }
        Ok(())
    }

    /// Swept skip range.
    pub fn skips(&self) -> Range<u32> {
        self.skip_start..self.skip_end
    }

    /// Sweep settings derived from this configuration.
    pub fn sweep(&self) -> SweepConfig {
        SweepConfig {
            bins: self.bins,
            skips: self.skips(),
            train_len: self.train_len,
            workers: self.workers,
        }
    }
}

fn default_bins() -> u32 {
    4
}

fn default_skip_end() -> u32 {
    24
}

fn default_workers() -> usize {
    num_cpus::get().max(1)
}

fn default_warmup_words() -> usize {
    DEFAULT_WARMUP_WORDS
}

fn default_histogram_offset() -> u32 {
    DEFAULT_HISTOGRAM_OFFSET
}

fn default_histogram_width() -> u32 {
    DEFAULT_HISTOGRAM_WIDTH
}

fn default_correlation_bits() -> u32 {
    25
}

fn default_correlation_len() -> usize {
    100_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.bins, 4);
        assert_eq!(config.skips(), 0..24);
        assert_eq!(config.train_len, None);
        assert_eq!(config.trailing_bytes, TrailingBytes::Truncate);
        assert!(config.workers >= 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml_partial() {
        let config = AnalysisConfig::from_toml(
            r#"
            bins = 6
            skip_end = 20
            xor_transform = true
            trailing_bytes = "reject"
            "#,
        )
        .unwrap();
        assert_eq!(config.bins, 6);
        assert_eq!(config.skips(), 0..20);
        assert!(config.xor_transform);
        assert_eq!(config.trailing_bytes, TrailingBytes::Reject);
        assert_eq!(config.histogram_offset, 14);
    }

    #[test]
    fn test_from_toml_invalid() {
        assert!(matches!(
            AnalysisConfig::from_toml("bins = 0"),
            Err(Error::Config(_))
        ));
        assert!(AnalysisConfig::from_toml("skip_start = 10\nskip_end = 5").is_err());
        assert!(AnalysisConfig::from_toml("bins = \"four\"").is_err());
    }

    #[test]
    fn test_bins_cap() {
        assert!(AnalysisConfig::from_toml("bins = 24").is_ok());

        let config = AnalysisConfig {
            bins: 30,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("bins 30 exceeds the maximum of 24"));
    }

    #[test]
    fn test_sweep_config() {
        let config = AnalysisConfig {
            train_len: Some(1000),
            workers: 2,
            ..Default::default()
        };
        let sweep = config.sweep();
        assert_eq!(sweep.bins, 4);
        assert_eq!(sweep.skips, 0..24);
        assert_eq!(sweep.train_len, Some(1000));
        assert_eq!(sweep.workers, 2);
    }
}
