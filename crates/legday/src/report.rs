//! Text rendering and tabular export of sweep results.

use std::fmt::Write as _;
use std::io::Write;

use serde::Serialize;

use legday_core::{Error, Result};

use crate::context::ProbabilityTable;
use crate::summary::FlipMatrix;
use crate::sweep::SweepResult;

const VALUES_PER_LINE: usize = 8;

/// Format values with two decimals, eight per line.
pub fn format_probabilities(values: &[f64]) -> String {
    let mut out = String::new();
    for (i, chunk) in values.chunks(VALUES_PER_LINE).enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let line: Vec<String> = chunk.iter().map(|v| format!("{:.2}", v)).collect();
        out.push_str(&line.join(" "));
    }
    out
}

/// Format the 32 previous-word flip rates, eight per line.
pub fn format_flip_rates(rates: &[f64; 32]) -> String {
    format_probabilities(rates)
}

/// Render one table with its target-bit header.
pub fn render_table(table: &ProbabilityTable) -> String {
    format!(
        "taking bit {} ({:.4} bits/word)\n{}",
        table.window().target_bit(),
        table.bits_per_word(),
        format_probabilities(table.probabilities())
    )
}

/// Render a flip matrix, one row per line.
pub fn render_matrix(matrix: &FlipMatrix) -> String {
    let mut out = String::new();
    for row in matrix.rows() {
        let line: Vec<String> = row.iter().map(|v| format!("{:.2}", v)).collect();
        let _ = writeln!(out, "{}", line.join(" "));
    }
    out
}

#[derive(Serialize)]
struct CsvRow {
    skip: u32,
    bins: u32,
    target_bit: u32,
    context: usize,
    ones: u64,
    observations: u64,
    probability: f64,
}

/// Write every accepted table as CSV, one row per (skip, context).
///
/// Columns: `skip,bins,target_bit,context,ones,observations,probability`.
pub fn write_sweep_csv<W: Write>(writer: W, result: &SweepResult) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    for table in result.tables() {
        let window = table.window();
        for (context, &probability) in table.probabilities().iter().enumerate() {
            wtr.serialize(CsvRow {
                skip: window.skip(),
                bins: window.bins(),
                target_bit: window.target_bit(),
                context,
                ones: table.ones()[context],
                observations: table.observations(context),
                probability,
            })
            .map_err(|e| Error::serialization(e.to_string()))?;
        }
    }

    wtr.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct JsonEntry<'a> {
    skip: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    table: Option<&'a ProbabilityTable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bits_per_word: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct JsonSweep<'a> {
    bins: u32,
    train_len: usize,
    entries: Vec<JsonEntry<'a>>,
}

/// Write the whole sweep, rejected configurations included, as pretty JSON.
pub fn write_sweep_json<W: Write>(mut writer: W, result: &SweepResult) -> Result<()> {
    let entries = result
        .entries()
        .iter()
        .map(|entry| match &entry.outcome {
            Ok(table) => JsonEntry {
                skip: entry.skip,
                table: Some(table),
                bits_per_word: Some(table.bits_per_word()),
                error: None,
            },
            Err(e) => JsonEntry {
                skip: entry.skip,
                table: None,
                bits_per_word: None,
                error: Some(e.to_string()),
            },
        })
        .collect();

    let sweep = JsonSweep {
        bins: result.bins(),
        train_len: result.train_len(),
        entries,
    };

    serde_json::to_writer_pretty(&mut writer, &sweep)
        .map_err(|e| Error::serialization(e.to_string()))?;
    writer.flush()?;
    Ok(())
}
