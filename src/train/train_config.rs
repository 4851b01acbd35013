use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::{Arc, atomic::AtomicBool};

use serde::{Serialize, Deserialize};

use crate::error::{NetError, Result};
use crate::train::error_series::EpochError;

/// How the steps of one epoch are dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// One step after another, in dataset order.
    #[default]
    Sequential,
    /// One step per sample, fanned out over a thread pool.
    Parallel,
}

/// How concurrent steps of the parallel trainer share the parameters.
///
/// - `Wild`   — no mutual exclusion around parameter reads and writes.
///   Steps may read half-updated parameters and overwrite each other's
///   updates, so results vary from run to run.
/// - `Locked` — every step runs under one mutex and sees a consistent
///   snapshot; only the order of steps within an epoch is unspecified.
///
/// Loss accumulation is race-free under both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamSync {
    #[default]
    Wild,
    Locked,
}

/// Configuration for a training run.
///
/// # Fields
/// - `epochs`        — total number of full passes over the dataset
/// - `learning_rate` — step size, finite and positive
/// - `log_every`     — an `info!` line is logged for every epoch divisible by
///                     this; `0` disables progress logging
/// - `sync`          — parameter sharing policy of the parallel trainer
/// - `threads`       — worker count of the parallel trainer; `None` uses
///                     rayon's default
/// - `error_log`     — when set, the finished series is written here as
///                     `epoch,mean_error` lines
/// - `progress_tx`   — optional channel sender; one `EpochError` is sent per
///                     completed epoch.  If the receiver is dropped the run
///                     stops after that epoch.
/// - `stop_flag`     — optional atomic flag; when set to `true` from another
///                     thread the run stops before the next epoch.
#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub epochs: usize,
    pub learning_rate: f64,
    pub log_every: usize,
    pub sync: ParamSync,
    pub threads: Option<usize>,
    pub error_log: Option<PathBuf>,
    pub progress_tx: Option<mpsc::Sender<EpochError>>,
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl TrainConfig {
    pub const DEFAULT_LOG_EVERY: usize = 1000;

    /// Creates a `TrainConfig` that logs every 1000th epoch, uses wild
    /// parameter sharing, and has no error log, channel or stop flag.
    pub fn new(epochs: usize, learning_rate: f64) -> Self {
        TrainConfig {
            epochs,
            learning_rate,
            log_every: Self::DEFAULT_LOG_EVERY,
            sync: ParamSync::default(),
            threads: None,
            error_log: None,
            progress_tx: None,
            stop_flag: None,
        }
    }

    pub fn with_sync(mut self, sync: ParamSync) -> Self {
        self.sync = sync;
        self
    }

    pub fn with_error_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.error_log = Some(path.into());
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(NetError::Config(format!(
                "learning rate must be finite and positive, got {}",
                self.learning_rate
            )));
        }
        if self.threads == Some(0) {
            return Err(NetError::Config("thread count must be at least 1".into()));
        }
        Ok(())
    }
}
