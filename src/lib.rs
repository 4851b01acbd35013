pub mod activation;
pub mod config;
pub mod data;
pub mod error;
pub mod loss;
pub mod math;
pub mod network;
pub mod plot;
pub mod train;

// Convenience re-exports
pub use activation::{sigmoid, sigmoid_derivative};
pub use config::{RunConfig, RunMode};
pub use data::{load_csv, Dataset, Sample};
pub use error::{NetError, Result};
pub use math::Matrix;
pub use network::Network;
pub use train::{
    train_network, train_parallel, train_sequential, EpochError, ErrorSeries, ExecutionMode,
    ParamSync, TrainConfig,
};
