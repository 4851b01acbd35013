use crate::data::Dataset;
use crate::error::Result;
use crate::network::Network;
use crate::train::error_series::ErrorSeries;
use crate::train::parallel::train_parallel;
use crate::train::sequential::train_sequential;
use crate::train::train_config::{ExecutionMode, TrainConfig};

/// Trains `network` on `dataset` with the trainer selected by `mode`.
pub fn train_network(
    network: &mut Network,
    dataset: &Dataset,
    mode: ExecutionMode,
    config: &TrainConfig,
) -> Result<ErrorSeries> {
    match mode {
        ExecutionMode::Sequential => train_sequential(network, dataset, config),
        ExecutionMode::Parallel   => train_parallel(network, dataset, config),
    }
}
