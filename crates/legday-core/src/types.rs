//! Core type definitions shared by the analyzer and the comparison harness.

use serde::{Deserialize, Serialize};

/// Width of an analyzed word in bits.
pub const WORD_BITS: u32 = 32;

/// Element layout of a dumped weight tensor.
///
/// Selects the compressor mode when comparing compression results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Layout {
    /// IEEE-754 single precision.
    Fp32,
    /// IEEE-754 half precision.
    Fp16,
    /// Brain float 16.
    Bf16,
    /// 8-bit float.
    Fp8,
    /// 8-bit integer.
    Int8,
}

impl Layout {
    /// Mode flag understood by the compression utility.
    pub fn mode_flag(self) -> &'static str {
        match self {
            Layout::Fp32 => "FP32",
            Layout::Fp16 => "FP16",
            Layout::Bf16 => "BF16",
            Layout::Fp8 => "FP8",
            Layout::Int8 => "INT8",
        }
    }

    /// Infer the layout from a dumped tensor file name.
    ///
    /// Dumps are named `<model>.<tensor>.<dtype>.bin`. Half-precision floats
    /// are routed through the BF16 mode; anything unrecognized is treated as
    /// INT8.
    pub fn from_file_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.contains("float32") {
            Layout::Fp32
        } else if lower.contains("bfloat16") || lower.contains("float16") {
            Layout::Bf16
        } else {
            Layout::Int8
        }
    }
}

impl std::fmt::Display for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mode_flag())
    }
}

/// Compression ratio metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressionRatio {
    /// Original uncompressed size in bytes.
    pub original_size: u64,
    /// Compressed size in bytes.
    pub compressed_size: u64,
}

impl CompressionRatio {
    /// Create new ratio from sizes.
    pub fn new(original: u64, compressed: u64) -> Self {
        CompressionRatio {
            original_size: original,
            compressed_size: compressed,
        }
    }

    /// Calculate ratio (original / compressed).
    /// Higher is better (more compression).
    pub fn ratio(&self) -> f64 {
        if self.compressed_size == 0 {
            return 0.0;
        }
        self.original_size as f64 / self.compressed_size as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_from_file_name() {
        assert_eq!(
            Layout::from_file_name("model.layer0.weight.torch.float32.bin"),
            Layout::Fp32
        );
        assert_eq!(
            Layout::from_file_name("model.embed.torch.bfloat16.bin"),
            Layout::Bf16
        );
        assert_eq!(
            Layout::from_file_name("MODEL.HEAD.TORCH.FLOAT16.BIN"),
            Layout::Bf16
        );
        assert_eq!(Layout::from_file_name("model.q.torch.int8.bin"), Layout::Int8);
        assert_eq!(Layout::from_file_name("weights.bin"), Layout::Int8);
    }

    #[test]
    fn test_layout_mode_flag() {
        assert_eq!(Layout::Fp32.mode_flag(), "FP32");
        assert_eq!(Layout::Int8.mode_flag(), "INT8");
        assert_eq!(Layout::Bf16.to_string(), "BF16");
    }

    #[test]
    fn test_ratio() {
        let r = CompressionRatio::new(1000, 250);
        assert!((r.ratio() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_ratio_degenerate() {
        assert_eq!(CompressionRatio::new(10, 0).ratio(), 0.0);
        assert_eq!(CompressionRatio::new(0, 10).ratio(), 0.0);
    }
}
