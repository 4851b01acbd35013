pub mod error_series;
pub mod loop_fn;
pub mod parallel;
pub mod sequential;
pub mod train_config;
pub mod trainer;

pub use error_series::{EpochError, ErrorSeries};
pub use parallel::train_parallel;
pub use sequential::train_sequential;
pub use train_config::{ExecutionMode, ParamSync, TrainConfig};
pub use trainer::train_network;
