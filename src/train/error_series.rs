use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::error::Result;

/// Mean training error of one completed epoch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpochError {
    /// 0-based epoch index.
    pub epoch: usize,
    /// Mean over all samples of the per-sample squared error.
    pub mean_error: f64,
}

/// Per-epoch errors of one training run, in epoch order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorSeries {
    points: Vec<EpochError>,
}

impl ErrorSeries {
    pub fn with_capacity(epochs: usize) -> ErrorSeries {
        ErrorSeries { points: Vec::with_capacity(epochs) }
    }

    pub(crate) fn push(&mut self, point: EpochError) {
        debug_assert!(self.points.last().map_or(true, |last| last.epoch < point.epoch));
        self.points.push(point);
    }

    pub fn points(&self) -> &[EpochError] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&EpochError> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&EpochError> {
        self.points.last()
    }

    pub fn mean_errors(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.mean_error).collect()
    }

    /// Largest error in the series, or `None` when empty.
    pub fn max_error(&self) -> Option<f64> {
        self.points.iter().map(|p| p.mean_error).reduce(f64::max)
    }

    /// Writes one `epoch,mean_error` line per epoch, no header.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = BufWriter::new(writer);
        for p in &self.points {
            writeln!(writer, "{},{}", p.epoch, p.mean_error)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Writes the series to `path` in the format of [`ErrorSeries::write_to`],
    /// replacing any existing file.
    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        self.write_to(file)
    }
}
