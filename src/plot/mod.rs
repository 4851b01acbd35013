pub mod chart;

pub use chart::{draw_error_chart, render_error_chart, ChartLine, PARALLEL_COLOR, SEQUENTIAL_COLOR};
