//! CSV dataset loading.
//!
//! Format:
//! - UTF-8, comma-separated
//! - The first line is a header and is always discarded
//! - Every following non-blank line holds exactly `input_size + output_size`
//!   numeric fields: inputs first, then targets
//! - Double-quoted fields are unquoted before parsing

use std::path::Path;

use log::debug;

use crate::data::dataset::{Dataset, Sample};
use crate::error::{NetError, Result};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Reads and validates a dataset file.
///
/// Every failure (missing file, header-only file, bad field count,
/// non-numeric field) is reported as [`NetError::DatasetLoad`].
pub fn load_csv(path: impl AsRef<Path>, input_size: usize, output_size: usize) -> Result<Dataset> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(NetError::dataset(path, "file not found"));
    }
    let text = std::fs::read_to_string(path)
        .map_err(|e| NetError::dataset(path, e.to_string()))?;

    let dataset = parse_csv(&text, input_size, output_size)
        .map_err(|reason| NetError::dataset(path, reason))?;
    debug!("loaded {} samples from {}", dataset.len(), path.display());
    Ok(dataset)
}

/// Parses CSV text into a dataset. Errors carry a 1-based line number.
pub fn parse_csv(text: &str, input_size: usize, output_size: usize) -> std::result::Result<Dataset, String> {
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() <= 1 {
        return Err("the file has no data rows after the header".into());
    }

    let width = input_size + output_size;
    let mut samples = Vec::with_capacity(lines.len() - 1);

    for (idx, line) in lines.iter().enumerate().skip(1) {
        let line_no = idx + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let cells = parse_csv_row(line);
        if cells.len() != width {
            return Err(format!(
                "line {}: expected {} fields ({} inputs + {} targets), got {}",
                line_no, width, input_size, output_size, cells.len()
            ));
        }

        let values = parse_floats(&cells, line_no)?;
        let target = values[input_size..].to_vec();
        let mut input = values;
        input.truncate(input_size);
        samples.push(Sample { input, target });
    }

    if samples.is_empty() {
        return Err("the file has no data rows after the header".into());
    }

    Dataset::from_samples(samples).map_err(|e| e.to_string())
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// Parses a single CSV row, handling double-quoted fields.
fn parse_csv_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    fields.push(current);
    fields
}

fn parse_floats(cells: &[String], line_no: usize) -> std::result::Result<Vec<f64>, String> {
    cells.iter()
        .map(|c| {
            c.trim().parse::<f64>().map_err(|_| {
                format!("line {}: '{}' is not a valid number", line_no, c.trim())
            })
        })
        .collect()
}
