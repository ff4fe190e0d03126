//! Compression comparison harness
//!
//! Runs a bitplane compressor over tensor dumps, measures gzip on the same
//! files and writes both sizes and ratios to a CSV report.
//!
//! ## Usage
//!
//! ```bash
//! compare ./legday model.*.bin
//! compare ./legday a.float32.bin b.bfloat16.bin --output results.csv
//! ```

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use legday::{compare_files, write_comparison_csv};

#[derive(Parser, Debug)]
#[command(name = "compare")]
#[command(version)]
#[command(about = "Compare a bitplane compressor against gzip", long_about = None)]
struct Args {
    /// Compression utility, invoked as `<utility> verify <MODE> <input> <output>`
    utility: String,

    /// Tensor dumps to compress
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// CSV report path
    #[arg(short, long, default_value = "compression_results.csv")]
    output: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn run(args: &Args) -> legday::Result<()> {
    let records = compare_files(&args.files, &args.utility)?;

    let file = File::create(&args.output)?;
    write_comparison_csv(BufWriter::new(file), &records)?;
    println!("Results written to {}", args.output.display());
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = legday_cli::init_tracing(&args.log_level) {
        eprintln!("error: failed to set tracing subscriber: {}", e);
        return ExitCode::FAILURE;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
