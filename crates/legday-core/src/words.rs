//! Word-stream ingestion.
//!
//! A [`WordStream`] is an immutable sequence of 32-bit signed words decoded
//! little-endian from a raw tensor dump. Dumps carry no header or framing.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Bytes per decoded word.
pub const WORD_BYTES: usize = 4;

/// Policy for buffers whose length is not a multiple of [`WORD_BYTES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrailingBytes {
    /// Drop the trailing partial word and log a warning.
    #[default]
    Truncate,
    /// Fail with [`Error::TruncatedWord`].
    Reject,
}

/// Ordered, immutable sequence of little-endian `i32` words.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordStream {
    words: Vec<i32>,
}

impl WordStream {
    /// Decode a byte buffer.
    ///
    /// The result holds `floor(bytes.len() / 4)` words; word `i` comes from
    /// bytes `[4i, 4i + 4)`.
    pub fn from_bytes(bytes: &[u8], policy: TrailingBytes) -> Result<Self> {
        let chunks = bytes.chunks_exact(WORD_BYTES);
        let trailing = chunks.remainder().len();

        if trailing != 0 {
            match policy {
                TrailingBytes::Reject => {
                    return Err(Error::TruncatedWord {
                        len: bytes.len(),
                        trailing,
                    });
                }
                TrailingBytes::Truncate => {
                    warn!(len = bytes.len(), trailing, "dropping trailing partial word");
                }
            }
        }

        let words = chunks
            .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();

        Ok(WordStream { words })
    }

    /// Read and decode a file.
    ///
    /// Returns [`Error::FileNotFound`] if the path does not exist and
    /// [`Error::Read`] for any other I/O failure.
    pub fn read_file(path: impl AsRef<Path>, policy: TrailingBytes) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| Error::read(path, e))?;
        debug!(path = %path.display(), bytes = bytes.len(), "read word stream");
        Self::from_bytes(&bytes, policy)
    }

    /// Number of words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Check if the stream holds no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Borrow all words.
    pub fn as_slice(&self) -> &[i32] {
        &self.words
    }

    /// Get word `index`, if present.
    pub fn get(&self, index: usize) -> Option<i32> {
        self.words.get(index).copied()
    }

    /// Iterate over the words in order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = i32> + '_ {
        self.words.iter().copied()
    }

    /// Borrow the first `len` words.
    ///
    /// Fails with [`Error::TrainLenOutOfRange`] rather than clamping, so a
    /// statistic never silently covers fewer words than requested.
    pub fn prefix(&self, len: usize) -> Result<&[i32]> {
        self.words
            .get(..len)
            .ok_or_else(|| Error::train_len_out_of_range(len, self.words.len()))
    }

    /// Encode back to little-endian bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.words.iter().flat_map(|w| w.to_le_bytes()).collect()
    }
}

impl From<Vec<i32>> for WordStream {
    fn from(words: Vec<i32>) -> Self {
        WordStream { words }
    }
}

impl FromIterator<i32> for WordStream {
    fn from_iter<T: IntoIterator<Item = i32>>(iter: T) -> Self {
        WordStream {
            words: iter.into_iter().collect(),
        }
    }
}
