// Bit-twiddling loops index dense tables by context key
#![allow(clippy::needless_range_loop)]

//! # Legday
//!
//! Bitplane context-correlation analyzer for quantized model weights.
//!
//! Measures how predictable each bit of a 32-bit word is given a small window
//! of lower bits in the same word, and given the same bit of the previous
//! word. The numbers calibrate the context model of a lossless bit predictor
//! and back the choice between its FP32, BF16 and INT8 modes.
//!
//! ## Pipeline
//!
//! ```text
//! bytes ─▶ WordStream ─▶ (xor_with_previous) ─▶ ProbabilityTable per skip ─▶ report
//!                    └─▶ summaries (flip rates, histograms, popcounts)
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use legday::{compute_probability_table, WordStream};
//!
//! let stream = WordStream::from(vec![0x0, 0x1, 0x3]);
//! let table = compute_probability_table(&stream, 0, 1, 3)?;
//! assert_eq!(table.probabilities(), &[0.0, 1.0 / 3.0]);
//! # Ok::<(), legday::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel` - Compute sweep configurations on a rayon pool (default)

pub mod compare;
pub mod config;
pub mod context;
pub mod report;
pub mod summary;
pub mod sweep;
pub mod transform;

pub use legday_core::{
    CompressionRatio, Error, Layout, Result, TrailingBytes, WordStream, WORD_BITS,
};

pub use compare::{compare_file, compare_files, write_comparison_csv, ComparisonRecord};
pub use config::{AnalysisConfig, MAX_BINS};
pub use context::{compute_probability_table, ContextAccumulator, ContextWindow, ProbabilityTable};
pub use report::{
    format_flip_rates, format_probabilities, render_matrix, render_table, write_sweep_csv,
    write_sweep_json,
};
pub use summary::{
    bitplane_popcount, pairwise_flip_matrix, previous_word_flip_rates, window_histogram,
    FlipMatrix, DEFAULT_HISTOGRAM_OFFSET, DEFAULT_HISTOGRAM_WIDTH, DEFAULT_WARMUP_WORDS,
};
pub use sweep::{run_sweep, SweepConfig, SweepEntry, SweepResult};
pub use transform::{undo_xor_with_previous, xor_with_previous};
