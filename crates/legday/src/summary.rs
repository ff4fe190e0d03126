//! Bit-independence summaries.
//!
//! Cheap single-pass reductions that complement the context tables:
//!
//! - **Flip rates**: how often each bit differs from the same bit of the
//!   previous word
//! - **Window histogram**: distribution of a fixed bit window, typically the
//!   exponent/high-mantissa region of a float
//! - **Pairwise flip matrix**: how often two bits of the same word differ
//! - **Bitplane popcount**: number of set bits per bit position

use serde::Serialize;

use legday_core::{Error, Result, WordStream, WORD_BITS};

/// Words skipped at the head of the stream before counting flips.
pub const DEFAULT_WARMUP_WORDS: usize = 10;

/// Default low bit of the histogram window (`22 - 8`).
pub const DEFAULT_HISTOGRAM_OFFSET: u32 = 14;

/// Default histogram window width.
pub const DEFAULT_HISTOGRAM_WIDTH: u32 = 8;

/// Widest histogram window; keeps the dense count table small.
pub const MAX_HISTOGRAM_WIDTH: u32 = 16;

#[inline]
fn bit(word: i32, n: u32) -> u32 {
    ((word as u32) >> n) & 1
}

/// Per-bit rate of change against the previous word.
///
/// Counts `bit_j(w[i]) ^ bit_j(w[i - 1])` for `i` in `[warmup, len)` and
/// normalizes by the full stream length, so the first `warmup` words lower
/// every rate slightly. An empty stream yields all zeros.
pub fn previous_word_flip_rates(stream: &WordStream, warmup: usize) -> [f64; 32] {
    let words = stream.as_slice();
    let mut flips = [0u64; 32];

    for i in warmup.max(1)..words.len() {
        let diff = (words[i] ^ words[i - 1]) as u32;
        for j in 0..WORD_BITS {
            flips[j as usize] += u64::from((diff >> j) & 1);
        }
    }

    let mut rates = [0.0; 32];
    if !words.is_empty() {
        let n = words.len() as f64;
        for j in 0..32 {
            rates[j] = flips[j] as f64 / n;
        }
    }
    rates
}

/// Histogram of the `width`-bit window starting at bit `offset`.
///
/// Returns a dense vector of `2^width` counts. The window must satisfy
/// `1 <= width <= 16` and `offset + width <= 32`.
pub fn window_histogram(stream: &WordStream, offset: u32, width: u32) -> Result<Vec<u64>> {
    let fits = (1..=MAX_HISTOGRAM_WIDTH).contains(&width)
        && offset.checked_add(width).is_some_and(|top| top <= WORD_BITS);
    if !fits {
        return Err(Error::InvalidWindow { offset, width });
    }

    let mask = (1u32 << width) - 1;
    let mut hist = vec![0u64; 1 << width];
    for word in stream.iter() {
        hist[(((word as u32) >> offset) & mask) as usize] += 1;
    }
    Ok(hist)
}

/// Ones per bit position across the whole stream.
pub fn bitplane_popcount(stream: &WordStream) -> [u64; 32] {
    let mut ones = [0u64; 32];
    for word in stream.iter() {
        for j in 0..WORD_BITS {
            ones[j as usize] += u64::from(bit(word, j));
        }
    }
    ones
}

/// Square matrix of pairwise in-word flip rates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlipMatrix {
    num_bits: usize,
    values: Vec<f64>,
}

impl FlipMatrix {
    /// Number of bit positions per side.
    pub fn num_bits(&self) -> usize {
        self.num_bits
    }

    /// Fraction of words in which bits `j` and `k` differ.
    pub fn get(&self, j: usize, k: usize) -> f64 {
        self.values[j * self.num_bits + k]
    }

    /// Iterate over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks(self.num_bits.max(1))
    }
}

/// Pairwise flip matrix over the low `num_bits` bits of the first `len` words.
///
/// Entry `(j, k)` is the fraction of those words whose bits `j` and `k`
/// differ; the diagonal is always 0 and the matrix is symmetric. Requires
/// `1 <= num_bits <= 32` and `len <= stream.len()`. A `len` of 0 yields an
/// all-zero matrix.
pub fn pairwise_flip_matrix(stream: &WordStream, num_bits: u32, len: usize) -> Result<FlipMatrix> {
    if !(1..=WORD_BITS).contains(&num_bits) {
        return Err(Error::InvalidWindow {
            offset: 0,
            width: num_bits,
        });
    }
    let words = stream.prefix(len)?;
    let n = num_bits as usize;

    let mut counts = vec![0u64; n * n];
    for &word in words {
        for j in 0..num_bits {
            let bj = bit(word, j);
            for k in (j + 1)..num_bits {
                let differ = u64::from(bj ^ bit(word, k));
                counts[j as usize * n + k as usize] += differ;
                counts[k as usize * n + j as usize] += differ;
            }
        }
    }

    let values = if len == 0 {
        vec![0.0; n * n]
    } else {
        counts.iter().map(|&c| c as f64 / len as f64).collect()
    };

    Ok(FlipMatrix {
        num_bits: n,
        values,
    })
}
