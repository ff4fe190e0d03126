//! Error types for bitplane analysis.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for analysis operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Analysis error types.
#[derive(Debug, Error)]
pub enum Error {
    /// Input file does not exist.
    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Input file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O error from an underlying reader or writer.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Buffer length is not a multiple of the word size.
    #[error("truncated word: {len} bytes leaves {trailing} trailing bytes")]
    TruncatedWord { len: usize, trailing: usize },

    /// Context window does not fit below the top bit of a word.
    #[error("invalid context window: skip {skip} + bins {bins} must be in [1, 32)")]
    InvalidContextWindow { skip: u32, bins: u32 },

    /// Summary extraction window does not fit in a word.
    #[error("invalid window: offset {offset}, width {width}")]
    InvalidWindow { offset: u32, width: u32 },

    /// Requested prefix is longer than the stream.
    #[error("train length {requested} exceeds stream length {available}")]
    TrainLenOutOfRange { requested: usize, available: usize },

    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Export or config serialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// External compression utility failed.
    #[error("{command} failed: {message}")]
    Utility { command: String, message: String },
}

impl Error {
    /// Create a read error for `path`.
    ///
    /// A missing file maps to [`Error::FileNotFound`] so callers can report
    /// it distinctly.
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound { path }
        } else {
            Error::Read { path, source }
        }
    }

    /// Create an invalid context window error.
    pub fn invalid_context_window(skip: u32, bins: u32) -> Self {
        Error::InvalidContextWindow { skip, bins }
    }

    /// Create a train length error.
    pub fn train_len_out_of_range(requested: usize, available: usize) -> Self {
        Error::TrainLenOutOfRange {
            requested,
            available,
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    /// Create a serialization error.
    pub fn serialization(message: impl Into<String>) -> Self {
        Error::Serialization(message.into())
    }

    /// Create an external utility error.
    pub fn utility(command: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Utility {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Get error category for log fields.
    pub fn category(&self) -> &'static str {
        match self {
            Error::FileNotFound { .. } => "file_not_found",
            Error::Read { .. } => "read_error",
            Error::Io(_) => "io_error",
            Error::TruncatedWord { .. } => "truncated_word",
            Error::InvalidContextWindow { .. } => "invalid_context_window",
            Error::InvalidWindow { .. } => "invalid_window",
            Error::TrainLenOutOfRange { .. } => "train_len_out_of_range",
            Error::Config(_) => "config",
            Error::Serialization(_) => "serialization",
            Error::Utility { .. } => "utility",
        }
    }
}
