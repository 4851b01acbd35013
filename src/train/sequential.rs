use crate::data::Dataset;
use crate::error::Result;
use crate::network::Network;
use crate::train::error_series::ErrorSeries;
use crate::train::loop_fn::{check_run, run_epochs};
use crate::train::train_config::TrainConfig;

/// Trains `network` one sample at a time, in dataset order.
///
/// Deterministic: the same initial parameters, dataset and learning rate
/// always produce the same series and the same final parameters.
pub fn train_sequential(
    network: &mut Network,
    dataset: &Dataset,
    config: &TrainConfig,
) -> Result<ErrorSeries> {
    check_run(network, dataset, config)?;
    let learning_rate = config.learning_rate;

    run_epochs(dataset.len(), config, "sequential", || {
        let mut total = 0.0;
        for sample in dataset {
            total += network.backpropagate_step(&sample.input, &sample.target, learning_rate)?;
        }
        Ok(total)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::builtin_identity;
    use crate::error::NetError;

    #[test]
    fn mismatched_dataset_is_rejected_up_front() {
        let mut net = Network::seeded(3, 4, 2, 1).unwrap();
        let before = net.clone();
        let err = train_sequential(&mut net, &builtin_identity(), &TrainConfig::new(10, 0.1)).unwrap_err();
        assert!(matches!(err, NetError::DimensionMismatch { what: "input", expected: 3, received: 2 }));
        assert_eq!(net, before);
    }

    #[test]
    fn one_epoch_equals_manual_steps() {
        let dataset = builtin_identity();
        let mut trained = Network::seeded(2, 4, 2, 3).unwrap();
        let mut manual = trained.clone();

        let series = train_sequential(&mut trained, &dataset, &TrainConfig::new(1, 0.5)).unwrap();

        let total: f64 = dataset.iter()
            .map(|s| manual.backpropagate_step(&s.input, &s.target, 0.5).unwrap())
            .sum();
        assert_eq!(series.points()[0].mean_error, total / 2.0);
        assert_eq!(trained, manual);
    }
}
