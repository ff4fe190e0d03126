//! Context-statistics engine.
//!
//! For a window of `bins` bits starting at bit `skip`, every word yields a
//! context key (the window value) and a target bit (the bit directly above
//! the window). Counting how often the target is set per key gives the
//! empirical conditional probability a context-modeling bit predictor would
//! learn for that bit position.
//!
//! ## Smoothing
//!
//! Totals start at 1 and ones at 0. A context seen `k` times with the target
//! set `j` times yields `j / (k + 1)`; an unobserved context yields exactly
//! `0.0`. Probabilities therefore lie in `[0, 1)`.
//!
//! ```text
//!  bit 31                                   bit 0
//!  ┌──────────┬────────┬──────────────┬────────┐
//!  │  unused  │ target │ context bins │  skip  │
//!  └──────────┴────────┴──────────────┴────────┘
//! ```

use serde::Serialize;
use tracing::debug;

use legday_core::{Error, Result, WordStream, WORD_BITS};

/// Geometry of a context window inside a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ContextWindow {
    skip: u32,
    bins: u32,
}

impl ContextWindow {
    /// Create a validated window.
    ///
    /// Requires `bins >= 1` and `skip + bins < 32` so the target bit stays
    /// inside the word. Anything else is [`Error::InvalidContextWindow`].
    pub fn new(skip: u32, bins: u32) -> Result<Self> {
        let fits = bins >= 1 && skip.checked_add(bins).is_some_and(|top| top < WORD_BITS);
        if !fits {
            return Err(Error::invalid_context_window(skip, bins));
        }
        Ok(ContextWindow { skip, bins })
    }

    /// Bit offset of the window's low end.
    pub fn skip(&self) -> u32 {
        self.skip
    }

    /// Window width in bits.
    pub fn bins(&self) -> u32 {
        self.bins
    }

    /// Bit position of the predicted bit.
    pub fn target_bit(&self) -> u32 {
        self.skip + self.bins
    }

    /// Number of distinct context keys (`2^bins`).
    pub fn contexts(&self) -> usize {
        1usize << self.bins
    }

    #[inline]
    fn mask(&self) -> u32 {
        (1u32 << self.bins) - 1
    }

    /// Context key of `word`.
    #[inline]
    pub fn key_of(&self, word: i32) -> usize {
        (((word as u32) >> self.skip) & self.mask()) as usize
    }

    /// Target bit of `word`.
    #[inline]
    pub fn target_of(&self, word: i32) -> u32 {
        ((word as u32) >> self.target_bit()) & 1
    }
}

/// Per-call dense counters for one window.
#[derive(Debug, Clone)]
pub struct ContextAccumulator {
    window: ContextWindow,
    ones: Vec<u64>,
    totals: Vec<u64>,
    observed: usize,
}

impl ContextAccumulator {
    /// Create zeroed counters with the Laplace base of 1 on every total.
    pub fn new(window: ContextWindow) -> Self {
        let n = window.contexts();
        ContextAccumulator {
            window,
            ones: vec![0; n],
            totals: vec![1; n],
            observed: 0,
        }
    }

    /// Record one word.
    #[inline]
    pub fn observe(&mut self, word: i32) {
        let key = self.window.key_of(word);
        self.ones[key] += u64::from(self.window.target_of(word));
        self.totals[key] += 1;
        self.observed += 1;
    }

    /// Record every word of `words` in order.
    pub fn observe_all(&mut self, words: &[i32]) {
        for &word in words {
            self.observe(word);
        }
    }

    /// Freeze the counters into a table.
    pub fn finish(self) -> ProbabilityTable {
        let probabilities = self
            .ones
            .iter()
            .zip(&self.totals)
            .map(|(&ones, &total)| ones as f64 / total as f64)
            .collect();

        ProbabilityTable {
            window: self.window,
            train_len: self.observed,
            ones: self.ones,
            totals: self.totals,
            probabilities,
        }
    }
}

/// Dense table of target-bit probabilities, one per context key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbabilityTable {
    window: ContextWindow,
    train_len: usize,
    ones: Vec<u64>,
    totals: Vec<u64>,
    probabilities: Vec<f64>,
}

impl ProbabilityTable {
    /// Window the table was trained on.
    pub fn window(&self) -> ContextWindow {
        self.window
    }

    /// Number of leading words scanned.
    pub fn train_len(&self) -> usize {
        self.train_len
    }

    /// Probability per context key. Always `2^bins` entries.
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Target-set counts per context key.
    pub fn ones(&self) -> &[u64] {
        &self.ones
    }

    /// Smoothed totals per context key (observations + 1).
    pub fn totals(&self) -> &[u64] {
        &self.totals
    }

    /// Number of entries (`2^bins`).
    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    /// Never true; tables are dense.
    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// Raw number of words that fell into context `key`.
    pub fn observations(&self, key: usize) -> u64 {
        self.totals.get(key).map_or(0, |t| t - 1)
    }

    /// Ideal code length in bits of all scanned target bits when each is
    /// coded with its context's table probability.
    pub fn estimated_cost_bits(&self) -> f64 {
        let mut bits = 0.0;
        for key in 0..self.probabilities.len() {
            let p = self.probabilities[key];
            let set = self.ones[key] as f64;
            let clear = self.observations(key) as f64 - set;
            if set > 0.0 {
                bits -= set * p.log2();
            }
            if clear > 0.0 {
                bits -= clear * (1.0 - p).log2();
            }
        }
        bits
    }

    /// [`estimated_cost_bits`](Self::estimated_cost_bits) averaged per word.
    ///
    /// Below 1.0 means the context predicts the target bit better than
    /// storing it verbatim.
    pub fn bits_per_word(&self) -> f64 {
        if self.train_len == 0 {
            return 0.0;
        }
        self.estimated_cost_bits() / self.train_len as f64
    }
}

/// Train a probability table on the first `train_len` words of `stream`.
///
/// Rejects the configuration before scanning when the window does not fit
/// ([`Error::InvalidContextWindow`]) or `train_len` exceeds the stream
/// ([`Error::TrainLenOutOfRange`]).
pub fn compute_probability_table(
    stream: &WordStream,
    skip: u32,
    bins: u32,
    train_len: usize,
) -> Result<ProbabilityTable> {
    let window = ContextWindow::new(skip, bins)?;
    let words = stream.prefix(train_len)?;

    let mut acc = ContextAccumulator::new(window);
    acc.observe_all(words);
    let table = acc.finish();

    debug!(
        skip,
        bins,
        train_len,
        target_bit = window.target_bit(),
        bits_per_word = table.bits_per_word(),
        "computed probability table"
    );

    Ok(table)
}
