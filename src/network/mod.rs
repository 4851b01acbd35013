pub mod network;
pub mod params;
pub mod propagate;

pub use network::Network;
pub use params::{Dims, ParamAccess, Parameters, Tensor, WildParameters};
