pub mod matrix;
pub mod wild;

pub use matrix::Matrix;
pub use wild::WildMatrix;
