//! Legday bitplane context analyzer
//!
//! Scans a raw tensor dump as little-endian 32-bit words and reports, for
//! every bit offset in the sweep, how well a small window of lower bits
//! predicts the bit above it.
//!
//! ## Usage
//!
//! ```bash
//! # Default sweep: 4-bit contexts, skips 0..24, whole file
//! analyze model.layer0.weight.torch.float32.bin
//!
//! # Whiten with the running XOR first and export the tables
//! analyze weights.bin --xor --csv tables.csv --json tables.json
//!
//! # Bit-independence summaries and the pairwise flip matrix
//! analyze weights.bin --summaries --correlation
//! ```

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::info;

use legday::report::{render_matrix, render_table};
use legday::{
    bitplane_popcount, format_flip_rates, pairwise_flip_matrix, previous_word_flip_rates,
    run_sweep, window_histogram, write_sweep_csv, write_sweep_json, xor_with_previous,
    AnalysisConfig, TrailingBytes, WordStream,
};

#[derive(Parser, Debug)]
#[command(name = "analyze")]
#[command(version)]
#[command(about = "Bitplane context-correlation analyzer for weight tensors", long_about = None)]
struct Args {
    /// Raw little-endian 32-bit word file
    path: PathBuf,

    /// Context width in bits
    #[arg(short, long)]
    bins: Option<u32>,

    /// First skip of the sweep (inclusive)
    #[arg(long)]
    skip_start: Option<u32>,

    /// Last skip of the sweep (exclusive)
    #[arg(long)]
    skip_end: Option<u32>,

    /// Leading words used for training (default: whole file)
    #[arg(short, long)]
    train_len: Option<usize>,

    /// Apply the running-XOR transform before gathering statistics
    #[arg(long)]
    xor: bool,

    /// Fail on a trailing partial word instead of dropping it
    #[arg(long)]
    strict: bool,

    /// Print flip rates, bitplane popcounts and the window histogram
    #[arg(long)]
    summaries: bool,

    /// Print the pairwise in-word flip matrix
    #[arg(long)]
    correlation: bool,

    /// Export accepted tables as CSV
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Export the sweep as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Sweep worker threads
    #[arg(short, long)]
    workers: Option<usize>,

    /// TOML configuration file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Args {
    fn to_config(&self) -> legday::Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::from_file(path)?,
            None => AnalysisConfig::default(),
        };

        if let Some(bins) = self.bins {
            config.bins = bins;
        }
        if let Some(start) = self.skip_start {
            config.skip_start = start;
        }
        if let Some(end) = self.skip_end {
            config.skip_end = end;
        }
        if self.train_len.is_some() {
            config.train_len = self.train_len;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        config.xor_transform |= self.xor;
        if self.strict {
            config.trailing_bytes = TrailingBytes::Reject;
        }

        config.validate()?;
        Ok(config)
    }
}

fn format_counts(counts: &[u64]) -> String {
    counts
        .chunks(8)
        .map(|line| {
            line.iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn run(args: &Args) -> legday::Result<()> {
    let config = args.to_config()?;

    let mut stream = WordStream::read_file(&args.path, config.trailing_bytes)?;
    if config.xor_transform {
        stream = xor_with_previous(&stream);
    }
    info!(
        path = %args.path.display(),
        words = stream.len(),
        xor = config.xor_transform,
        "loaded word stream"
    );

    println!(
        "{}: {} words{}",
        args.path.display(),
        stream.len(),
        if config.xor_transform { " (xor transformed)" } else { "" }
    );

    let result = run_sweep(&stream, &config.sweep())?;

    for entry in result.entries() {
        match &entry.outcome {
            Ok(table) => println!("{}", render_table(table)),
            Err(e) => println!("skip {} rejected: {}", entry.skip, e),
        }
    }
    if let Some(best) = result.best_by_cost() {
        println!(
            "best: bit {} at {:.4} bits/word",
            best.window().target_bit(),
            best.bits_per_word()
        );
    }

    if args.summaries {
        println!("previous-word flip rates");
        println!(
            "{}",
            format_flip_rates(&previous_word_flip_rates(&stream, config.warmup_words))
        );
        println!("bitplane popcount");
        println!("{}", format_counts(&bitplane_popcount(&stream)));
        println!(
            "window histogram (offset {}, width {})",
            config.histogram_offset, config.histogram_width
        );
        let hist = window_histogram(&stream, config.histogram_offset, config.histogram_width)?;
        println!("{}", format_counts(&hist));
    }

    if args.correlation {
        let len = config.correlation_len.min(stream.len());
        let matrix = pairwise_flip_matrix(&stream, config.correlation_bits, len)?;
        println!("pairwise flip matrix ({} bits, {} words)", matrix.num_bits(), len);
        print!("{}", render_matrix(&matrix));
    }

    if let Some(path) = &args.csv {
        let file = File::create(path)?;
        write_sweep_csv(BufWriter::new(file), &result)?;
        info!(path = %path.display(), "wrote CSV export");
    }
    if let Some(path) = &args.json {
        let file = File::create(path)?;
        write_sweep_json(BufWriter::new(file), &result)?;
        info!(path = %path.display(), "wrote JSON export");
    }

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
