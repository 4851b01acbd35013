use std::path::{Path, PathBuf};

use serde::{Serialize, Deserialize};

use crate::error::{NetError, Result};
use crate::train::{ExecutionMode, ParamSync, TrainConfig};

/// Which trainers a run executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    Sequential,
    Parallel,
    /// Sequential, then parallel, both from the same initial parameters.
    #[default]
    Both,
}

impl RunMode {
    pub fn modes(self) -> &'static [ExecutionMode] {
        match self {
            RunMode::Sequential => &[ExecutionMode::Sequential],
            RunMode::Parallel   => &[ExecutionMode::Parallel],
            RunMode::Both       => &[ExecutionMode::Sequential, ExecutionMode::Parallel],
        }
    }
}

/// Settings of one command-line run, loadable from JSON.
///
/// Every field has a default, so a config file only needs the values it
/// changes. Command-line flags override file values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// CSV dataset; the built-in identity dataset is used when absent.
    pub data: Option<PathBuf>,
    pub input_size: usize,
    pub hidden_size: usize,
    pub output_size: usize,
    pub epochs: usize,
    pub learning_rate: f64,
    /// Seed for parameter initialization; drawn at random when absent.
    pub seed: Option<u64>,
    pub mode: RunMode,
    pub sync: ParamSync,
    pub threads: Option<usize>,
    pub log_every: usize,
    /// Directory receiving error logs, the chart and the trained models.
    pub out_dir: PathBuf,
    pub chart: bool,
    /// Open the chart and the error logs with the system viewers once written.
    pub open_outputs: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            data: None,
            input_size: 2,
            hidden_size: 4,
            output_size: 2,
            epochs: 10_000,
            learning_rate: 0.1,
            seed: None,
            mode: RunMode::Both,
            sync: ParamSync::Wild,
            threads: None,
            log_every: TrainConfig::DEFAULT_LOG_EVERY,
            out_dir: PathBuf::from("."),
            chart: true,
            open_outputs: false,
        }
    }
}

impl RunConfig {
    pub fn load_json(path: impl AsRef<Path>) -> Result<RunConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("input_size", self.input_size),
            ("hidden_size", self.hidden_size),
            ("output_size", self.output_size),
        ] {
            if value == 0 {
                return Err(NetError::InvalidDimension { name, value });
            }
        }
        self.train_config(ExecutionMode::Sequential).validate()
    }

    /// Library-level training settings for one trainer, with its error log
    /// placed in `out_dir`.
    pub fn train_config(&self, mode: ExecutionMode) -> TrainConfig {
        let mut cfg = TrainConfig::new(self.epochs, self.learning_rate)
            .with_sync(self.sync)
            .with_error_log(self.error_log_path(mode));
        cfg.threads = self.threads;
        cfg.log_every = self.log_every;
        cfg
    }

    pub fn error_log_path(&self, mode: ExecutionMode) -> PathBuf {
        self.out_dir.join(format!("errors_{}.csv", mode_name(mode)))
    }

    pub fn model_path(&self, mode: ExecutionMode) -> PathBuf {
        self.out_dir.join(format!("network_{}.json", mode_name(mode)))
    }

    pub fn chart_path(&self) -> PathBuf {
        self.out_dir.join("error_chart.png")
    }

    /// Files handed to the system viewer after a run: the chart when one is
    /// rendered, then the error log of every executed trainer.
    pub fn outputs_to_open(&self) -> Vec<PathBuf> {
        if !self.open_outputs {
            return Vec::new();
        }
        let chart = self.chart.then(|| self.chart_path());
        chart.into_iter()
            .chain(self.mode.modes().iter().map(|&mode| self.error_log_path(mode)))
            .collect()
    }
}

pub fn mode_name(mode: ExecutionMode) -> &'static str {
    match mode {
        ExecutionMode::Sequential => "sequential",
        ExecutionMode::Parallel   => "parallel",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: RunConfig = serde_json::from_str(r#"{ "epochs": 50, "sync": "locked" }"#).unwrap();
        assert_eq!(cfg.epochs, 50);
        assert_eq!(cfg.sync, ParamSync::Locked);
        assert_eq!(cfg.hidden_size, 4);
        assert_eq!(cfg.mode, RunMode::Both);
    }

    #[test]
    fn zero_hidden_size_fails_validation() {
        let cfg = RunConfig { hidden_size: 0, ..RunConfig::default() };
        assert!(matches!(cfg.validate(), Err(NetError::InvalidDimension { name: "hidden_size", .. })));
    }

    #[test]
    fn output_paths_live_in_out_dir() {
        let cfg = RunConfig { out_dir: PathBuf::from("runs"), ..RunConfig::default() };
        assert_eq!(cfg.error_log_path(ExecutionMode::Parallel), PathBuf::from("runs/errors_parallel.csv"));
        assert_eq!(cfg.chart_path(), PathBuf::from("runs/error_chart.png"));
        let train = cfg.train_config(ExecutionMode::Sequential);
        assert_eq!(train.error_log, Some(PathBuf::from("runs/errors_sequential.csv")));
    }

    #[test]
    fn open_lists_chart_and_every_error_log() {
        let cfg = RunConfig { out_dir: PathBuf::from("runs"), ..RunConfig::default() };
        assert!(cfg.outputs_to_open().is_empty());

        let cfg = RunConfig { open_outputs: true, ..cfg };
        assert_eq!(cfg.outputs_to_open(), vec![
            PathBuf::from("runs/error_chart.png"),
            PathBuf::from("runs/errors_sequential.csv"),
            PathBuf::from("runs/errors_parallel.csv"),
        ]);

        let cfg = RunConfig { chart: false, mode: RunMode::Parallel, ..cfg };
        assert_eq!(cfg.outputs_to_open(), vec![PathBuf::from("runs/errors_parallel.csv")]);
    }
}
