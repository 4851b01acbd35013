pub mod csv;
pub mod dataset;

pub use csv::{load_csv, parse_csv};
pub use dataset::{builtin_identity, builtin_xor, Dataset, Sample};
