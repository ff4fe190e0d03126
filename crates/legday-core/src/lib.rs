//! # Legday Core
//!
//! Core types, errors and word-stream ingestion for the legday bitplane
//! analyzer.
//!
//! Quantized weight tensors are dumped as flat little-endian word streams.
//! Everything downstream (transforms, context statistics, summaries) works
//! on a [`WordStream`], which this crate builds from raw bytes or files.
//!
//! ## Example
//!
//! ```
//! use legday_core::{TrailingBytes, WordStream};
//!
//! let stream = WordStream::from_bytes(&[1, 0, 0, 0, 2, 0, 0, 0], TrailingBytes::Truncate)?;
//! assert_eq!(stream.as_slice(), &[1, 2]);
//! # Ok::<(), legday_core::Error>(())
//! ```

pub mod error;
pub mod types;
pub mod words;

pub use error::{Error, Result};
pub use types::{CompressionRatio, Layout, WORD_BITS};
pub use words::{TrailingBytes, WordStream, WORD_BYTES};
