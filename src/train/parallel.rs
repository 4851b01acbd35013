use log::debug;
use parking_lot::Mutex;
use rayon::prelude::*;
use rayon::ThreadPool;

use crate::data::Dataset;
use crate::error::{NetError, Result};
use crate::network::{Network, WildParameters};
use crate::network::propagate::backprop_step;
use crate::train::error_series::ErrorSeries;
use crate::train::loop_fn::{check_run, run_epochs};
use crate::train::train_config::{ParamSync, TrainConfig};

/// Trains `network` with every sample of an epoch stepped concurrently on a
/// rayon pool.
///
/// All steps of an epoch finish before its mean error is taken. The
/// per-sample losses are combined by a parallel reduction, so none is lost.
/// Parameter sharing follows `config.sync`; under [`ParamSync::Wild`] the
/// series is not reproducible and generally differs from
/// [`train_sequential`](crate::train::train_sequential).
///
/// The network's parameters are moved into the shared store for the run and
/// written back when it ends, including when a step fails.
pub fn train_parallel(
    network: &mut Network,
    dataset: &Dataset,
    config: &TrainConfig,
) -> Result<ErrorSeries> {
    check_run(network, dataset, config)?;
    let pool = build_pool(config.threads)?;
    let dims = network.dims();
    let learning_rate = config.learning_rate;
    debug!(
        "parallel training on {} thread(s), {:?} parameter sharing",
        pool.current_num_threads(),
        config.sync
    );

    match config.sync {
        ParamSync::Wild => {
            let shared = WildParameters::from_parameters(network.parameters());
            let result = run_epochs(dataset.len(), config, "parallel", || {
                pool.install(|| {
                    dataset.samples().par_iter()
                        .map(|sample| {
                            let mut view = &shared;
                            backprop_step(&mut view, dims, &sample.input, &sample.target, learning_rate)
                        })
                        .try_reduce(|| 0.0, |a, b| Ok(a + b))
                })
            });
            network.replace_parameters(shared.to_parameters());
            result
        }
        ParamSync::Locked => {
            let shared = Mutex::new(network.parameters().clone());
            let result = run_epochs(dataset.len(), config, "parallel", || {
                pool.install(|| {
                    dataset.samples().par_iter()
                        .map(|sample| {
                            let mut params = shared.lock();
                            backprop_step(&mut *params, dims, &sample.input, &sample.target, learning_rate)
                        })
                        .try_reduce(|| 0.0, |a, b| Ok(a + b))
                })
            });
            network.replace_parameters(shared.into_inner());
            result
        }
    }
}

fn build_pool(threads: Option<usize>) -> Result<ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new()
        .thread_name(|i| format!("backprop-worker-{i}"));
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder.build().map_err(|e| NetError::Config(format!("cannot start worker pool: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{builtin_xor, Dataset};
    use crate::train::train_sequential;
    use approx::assert_relative_eq;

    fn single_sample() -> Dataset {
        Dataset::new(vec![vec![1.0, 0.0]], vec![vec![0.0, 1.0]]).unwrap()
    }

    #[test]
    fn one_sample_matches_sequential_in_both_modes() {
        let dataset = single_sample();
        let start = Network::seeded(2, 3, 2, 21).unwrap();

        let mut seq = start.clone();
        let expected = train_sequential(&mut seq, &dataset, &TrainConfig::new(50, 0.3)).unwrap();

        for sync in [ParamSync::Wild, ParamSync::Locked] {
            let mut par = start.clone();
            let cfg = TrainConfig::new(50, 0.3).with_sync(sync).with_threads(2);
            let series = train_parallel(&mut par, &dataset, &cfg).unwrap();
            assert_eq!(series, expected, "{sync:?}");
            assert_eq!(par, seq, "{sync:?}");
        }
    }

    fn flat(net: &Network) -> Vec<f64> {
        let p = net.parameters();
        [&p.w_ih, &p.w_ho, &p.b_h, &p.b_o].iter().flat_map(|m| m.flatten()).collect()
    }

    #[test]
    fn locked_mode_on_one_thread_tracks_sequential_over_every_sample() {
        let dataset = builtin_xor();
        let start = Network::seeded(2, 4, 2, 8).unwrap();

        let mut seq = start.clone();
        let expected = train_sequential(&mut seq, &dataset, &TrainConfig::new(20, 0.2)).unwrap();

        let mut par = start.clone();
        let cfg = TrainConfig::new(20, 0.2).with_sync(ParamSync::Locked).with_threads(1);
        let series = train_parallel(&mut par, &dataset, &cfg).unwrap();

        assert_eq!(series.len(), expected.len());
        for (got, want) in series.points().iter().zip(expected.points()) {
            assert_eq!(got.epoch, want.epoch);
            assert_relative_eq!(got.mean_error, want.mean_error, epsilon = 1e-12);
        }
        for (got, want) in flat(&par).iter().zip(flat(&seq).iter()) {
            assert_relative_eq!(*got, *want, epsilon = 1e-12);
        }
    }

    #[test]
    fn wild_first_epoch_sums_the_loss_of_all_four_samples() {
        let dataset = builtin_xor();
        let start = Network::seeded(2, 3, 2, 30).unwrap();

        // One worker steps the samples in dataset order.
        let mut manual = start.clone();
        let total: f64 = dataset.samples().iter()
            .map(|s| manual.backpropagate_step(&s.input, &s.target, 0.5).unwrap())
            .sum();
        let first_only = {
            let s = &dataset.samples()[0];
            start.clone().backpropagate_step(&s.input, &s.target, 0.5).unwrap()
        };

        let mut par = start.clone();
        let cfg = TrainConfig::new(1, 0.5).with_sync(ParamSync::Wild).with_threads(1);
        let series = train_parallel(&mut par, &dataset, &cfg).unwrap();

        let mean = series.points()[0].mean_error;
        assert_relative_eq!(mean, total / 4.0, epsilon = 1e-12);
        assert!((mean - first_only / 4.0).abs() > 1e-9);
        for (got, want) in flat(&par).iter().zip(flat(&manual).iter()) {
            assert_relative_eq!(*got, *want, epsilon = 1e-12);
        }
    }

    #[test]
    fn first_epoch_error_equals_untrained_loss_when_locked_on_one_thread() {
        // On a single worker the first step of the epoch sees the initial
        // parameters; with one sample per epoch the mean is exactly that loss.
        let dataset = single_sample();
        let net = Network::seeded(2, 2, 2, 4).unwrap();
        let out = net.forward(&dataset.samples()[0].input).unwrap();
        let expected = crate::loss::MseLoss::loss(&out, &dataset.samples()[0].target);

        let mut trained = net.clone();
        let cfg = TrainConfig::new(1, 0.1).with_sync(ParamSync::Locked).with_threads(1);
        let series = train_parallel(&mut trained, &dataset, &cfg).unwrap();
        assert_relative_eq!(series.points()[0].mean_error, expected);
    }
}
