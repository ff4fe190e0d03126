//! Sweep driver.
//!
//! Computes one probability table per `skip` in a range while holding the
//! context width and training length fixed. Every configuration is
//! independent, so with the `parallel` feature they run on a rayon pool with
//! shared read-only access to the stream. Results always come back in skip
//! order.
//!
//! ## Usage
//!
//! ```
//! use legday::{run_sweep, SweepConfig, WordStream};
//!
//! let stream = WordStream::from((0..1024).collect::<Vec<i32>>());
//! let config = SweepConfig { bins: 4, skips: 0..30, train_len: None, workers: 2 };
//! let result = run_sweep(&stream, &config)?;
//!
//! assert_eq!(result.tables().count(), 28);
//! assert_eq!(result.rejected().count(), 2);
//! # Ok::<(), legday::Error>(())
//! ```

use std::ops::Range;
use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{info, warn};

use legday_core::{Error, Result, WordStream};

use crate::context::{compute_probability_table, ProbabilityTable};

/// Sweep settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepConfig {
    /// Context width in bits.
    pub bins: u32,
    /// Skips to evaluate, in order.
    pub skips: Range<u32>,
    /// Leading words used for training; whole stream when `None`.
    pub train_len: Option<usize>,
    /// Worker threads (ignored without the `parallel` feature).
    pub workers: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            bins: 4,
            skips: 0..24,
            train_len: None,
            workers: num_cpus::get().max(1),
        }
    }
}

/// Outcome of one sweep configuration.
#[derive(Debug)]
pub struct SweepEntry {
    /// Window offset of this configuration.
    pub skip: u32,
    /// Table, or the reason the configuration was rejected.
    pub outcome: Result<ProbabilityTable>,
}

/// Ordered sweep outcomes, one per skip.
#[derive(Debug)]
pub struct SweepResult {
    bins: u32,
    train_len: usize,
    entries: Vec<SweepEntry>,
}

impl SweepResult {
    /// Context width shared by every entry.
    pub fn bins(&self) -> u32 {
        self.bins
    }

    /// Training length shared by every entry.
    pub fn train_len(&self) -> usize {
        self.train_len
    }

    /// All entries in skip order.
    pub fn entries(&self) -> &[SweepEntry] {
        &self.entries
    }

    /// Accepted tables in skip order.
    pub fn tables(&self) -> impl Iterator<Item = &ProbabilityTable> {
        self.entries.iter().filter_map(|e| e.outcome.as_ref().ok())
    }

    /// Rejected configurations as `(skip, error)`.
    pub fn rejected(&self) -> impl Iterator<Item = (u32, &Error)> {
        self.entries
            .iter()
            .filter_map(|e| e.outcome.as_ref().err().map(|err| (e.skip, err)))
    }

    /// Table with the lowest estimated coding cost per word.
    pub fn best_by_cost(&self) -> Option<&ProbabilityTable> {
        self.tables()
            .min_by(|a, b| a.bits_per_word().total_cmp(&b.bits_per_word()))
    }
}

/// Run one table computation per skip in `config.skips`.
///
/// Invalid configurations are logged and kept as rejected entries; they never
/// abort the remaining ones. Fails only when the worker pool cannot be built.
pub fn run_sweep(stream: &WordStream, config: &SweepConfig) -> Result<SweepResult> {
    let train_len = config.train_len.unwrap_or(stream.len());
    let skips: Vec<u32> = config.skips.clone().collect();
    let start = Instant::now();

    info!(
        words = stream.len(),
        bins = config.bins,
        train_len,
        configurations = skips.len(),
        "starting context sweep"
    );

    let compute = |skip: u32| SweepEntry {
        skip,
        outcome: compute_probability_table(stream, skip, config.bins, train_len),
    };

    #[cfg(feature = "parallel")]
    let entries: Vec<SweepEntry> = {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.workers.max(1))
            .build()
            .map_err(|e| Error::config(format!("failed to create thread pool: {}", e)))?;
        pool.install(|| skips.par_iter().map(|&skip| compute(skip)).collect())
    };

    #[cfg(not(feature = "parallel"))]
    let entries: Vec<SweepEntry> = skips.iter().map(|&skip| compute(skip)).collect();

    for entry in &entries {
        if let Err(e) = &entry.outcome {
            warn!(skip = entry.skip, category = e.category(), "rejected configuration: {}", e);
        }
    }

    info!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        "context sweep complete"
    );

    Ok(SweepResult {
        bins: config.bins,
        train_len,
        entries,
    })
}
