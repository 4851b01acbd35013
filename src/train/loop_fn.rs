use std::sync::atomic::Ordering;
use std::time::Instant;

use log::{debug, info};

use crate::data::Dataset;
use crate::error::{NetError, Result};
use crate::network::Network;
use crate::train::error_series::{EpochError, ErrorSeries};
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Shared epoch driver
// ---------------------------------------------------------------------------

/// Runs `config.epochs` epochs and builds the error series.
///
/// `run_epoch` performs every backpropagation step of one epoch and returns
/// the sum of the per-sample losses. This function turns that sum into the
/// epoch mean, appends it to the series, logs progress, feeds the progress
/// channel, honours the stop flag, and finally writes the error log.
///
/// # Early termination
/// The loop breaks early if:
/// - the `progress_tx` receiver has been dropped, **or**
/// - `config.stop_flag` is set to `true`.
pub(crate) fn run_epochs<F>(
    n_samples: usize,
    config: &TrainConfig,
    mode: &str,
    mut run_epoch: F,
) -> Result<ErrorSeries>
where
    F: FnMut() -> Result<f64>,
{
    let mut series = ErrorSeries::with_capacity(config.epochs);
    let t_start = Instant::now();

    for epoch in 0..config.epochs {
        if let Some(ref flag) = config.stop_flag {
            if flag.load(Ordering::Relaxed) {
                info!("{mode} training stopped before epoch {epoch}");
                break;
            }
        }

        let total = run_epoch()?;
        let point = EpochError { epoch, mean_error: total / n_samples as f64 };
        series.push(point);

        if config.log_every > 0 && epoch % config.log_every == 0 {
            info!("epoch {epoch} ({mode}) - error: {}", point.mean_error);
        }

        if let Some(ref tx) = config.progress_tx {
            // If the receiver has been dropped, stop training.
            if tx.send(point).is_err() {
                debug!("progress receiver dropped, stopping {mode} training after epoch {epoch}");
                break;
            }
        }
    }

    debug!(
        "{mode} training ran {} epoch(s) in {} ms",
        series.len(),
        t_start.elapsed().as_millis()
    );

    if let Some(ref path) = config.error_log {
        series.write_csv(path)?;
        info!("{mode} error log written to {}", path.display());
    }

    Ok(series)
}

/// Checks the run configuration and that the dataset fits the network.
pub(crate) fn check_run(network: &Network, dataset: &Dataset, config: &TrainConfig) -> Result<()> {
    config.validate()?;
    let dims = network.dims();
    if dataset.input_size() != dims.input {
        return Err(NetError::mismatch("input", dims.input, dataset.input_size()));
    }
    if dataset.output_size() != dims.output {
        return Err(NetError::mismatch("target", dims.output, dataset.output_size()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{atomic::AtomicBool, mpsc, Arc};

    #[test]
    fn mean_is_sum_over_sample_count() {
        let cfg = TrainConfig::new(3, 0.1);
        let mut calls = 0.0;
        let series = run_epochs(4, &cfg, "test", || {
            calls += 1.0;
            Ok(calls * 2.0)
        })
        .unwrap();
        assert_eq!(series.mean_errors(), vec![0.5, 1.0, 1.5]);
        let epochs: Vec<usize> = series.points().iter().map(|p| p.epoch).collect();
        assert_eq!(epochs, vec![0, 1, 2]);
    }

    #[test]
    fn zero_epochs_give_empty_series() {
        let cfg = TrainConfig::new(0, 0.1);
        let series = run_epochs(1, &cfg, "test", || panic!("no epoch should run")).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn raised_stop_flag_halts_before_first_epoch() {
        let mut cfg = TrainConfig::new(5, 0.1);
        cfg.stop_flag = Some(Arc::new(AtomicBool::new(true)));
        let series = run_epochs(1, &cfg, "test", || Ok(1.0)).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn dropped_receiver_stops_after_current_epoch() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let mut cfg = TrainConfig::new(5, 0.1);
        cfg.progress_tx = Some(tx);
        let series = run_epochs(1, &cfg, "test", || Ok(1.0)).unwrap();
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn progress_channel_receives_every_epoch() {
        let (tx, rx) = mpsc::channel();
        let mut cfg = TrainConfig::new(3, 0.1);
        cfg.progress_tx = Some(tx);
        let series = run_epochs(2, &cfg, "test", || Ok(1.0)).unwrap();
        drop(cfg);
        let received: Vec<EpochError> = rx.iter().collect();
        assert_eq!(received, series.points());
    }

    #[test]
    fn epoch_failure_propagates() {
        let cfg = TrainConfig::new(3, 0.1);
        let err = run_epochs(1, &cfg, "test", || Err(NetError::mismatch("input", 2, 3))).unwrap_err();
        assert!(matches!(err, NetError::DimensionMismatch { .. }));
    }
}
