//! Compression comparison against a gzip baseline.
//!
//! Runs an external bitplane compressor over tensor dumps and records its
//! output size next to the size `gzip` reaches on the same file. The
//! compressor is invoked as
//!
//! ```text
//! <utility> verify <FP32|BF16|INT8> <input> <output>
//! ```
//!
//! with the mode inferred from the dump's file name.

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::Path;
use std::process::Command;

use flate2::write::GzEncoder;
use flate2::Compression;
use serde::Serialize;
use tracing::{info, warn};

use legday_core::{CompressionRatio, Error, Layout, Result};

/// Sizes measured for one input file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRecord {
    /// Input path as given.
    pub filename: String,
    /// Mode passed to the utility.
    #[serde(skip)]
    pub layout: Layout,
    /// Input size in bytes.
    pub original_size: u64,
    /// Utility output size in bytes.
    pub utility_size: u64,
    /// Gzip output size in bytes.
    pub gzip_size: u64,
    /// `original_size / utility_size`.
    pub utility_compression_ratio: f64,
    /// `original_size / gzip_size`.
    pub gzip_compression_ratio: f64,
}

/// Byte-counting sink for the gzip encoder.
#[derive(Default)]
struct CountingWriter {
    written: u64,
}

impl Write for CountingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.written += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Size of `path` after gzip at the default level.
pub fn gzip_size(path: &Path) -> Result<u64> {
    let file = File::open(path).map_err(|e| Error::read(path, e))?;
    let mut encoder = GzEncoder::new(CountingWriter::default(), Compression::default());
    io::copy(&mut BufReader::new(file), &mut encoder)?;
    Ok(encoder.finish()?.written)
}

/// Compress `path` with `utility` and gzip, returning both sizes.
pub fn compare_file(path: &Path, utility: &str) -> Result<ComparisonRecord> {
    let original_size = std::fs::metadata(path)
        .map_err(|e| Error::read(path, e))?
        .len();

    let layout = Layout::from_file_name(&path.to_string_lossy());
    let scratch = tempfile::tempdir()?;
    let output = scratch.path().join("out.bin");

    let status = Command::new(utility)
        .arg("verify")
        .arg(layout.mode_flag())
        .arg(path)
        .arg(&output)
        .status()
        .map_err(|e| Error::utility(utility, e.to_string()))?;
    if !status.success() {
        return Err(Error::utility(utility, format!("exited with {}", status)));
    }

    let utility_size = std::fs::metadata(&output)
        .map_err(|e| Error::utility(utility, format!("no output written: {}", e)))?
        .len();
    let gzip_size = gzip_size(path)?;

    Ok(ComparisonRecord {
        filename: path.display().to_string(),
        layout,
        original_size,
        utility_size,
        gzip_size,
        utility_compression_ratio: CompressionRatio::new(original_size, utility_size).ratio(),
        gzip_compression_ratio: CompressionRatio::new(original_size, gzip_size).ratio(),
    })
}

/// Compare every file, skipping (and logging) the ones that fail.
///
/// Fails only when no file could be compared.
pub fn compare_files<P: AsRef<Path>>(paths: &[P], utility: &str) -> Result<Vec<ComparisonRecord>> {
    let mut records = Vec::with_capacity(paths.len());

    for path in paths {
        let path = path.as_ref();
        match compare_file(path, utility) {
            Ok(record) => {
                info!(
                    file = %record.filename,
                    mode = %record.layout,
                    utility_ratio = record.utility_compression_ratio,
                    gzip_ratio = record.gzip_compression_ratio,
                    "compared"
                );
                records.push(record);
            }
            Err(e) => warn!(file = %path.display(), "error compressing: {}", e),
        }
    }

    if records.is_empty() {
        return Err(Error::utility(utility, "no files were compressed"));
    }
    Ok(records)
}

/// Write comparison records as CSV.
pub fn write_comparison_csv<W: Write>(writer: W, records: &[ComparisonRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record)
            .map_err(|e| Error::serialization(e.to_string()))?;
    }
    wtr.flush()?;
    Ok(())
}
