use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{info, warn};

use ferrite_backprop::config::mode_name;
use ferrite_backprop::data::builtin_identity;
use ferrite_backprop::plot::{render_error_chart, ChartLine, PARALLEL_COLOR, SEQUENTIAL_COLOR};
use ferrite_backprop::{
    load_csv, train_network, ErrorSeries, ExecutionMode, Network, ParamSync, RunConfig, RunMode,
};

/// Trains a single-hidden-layer network sequentially and in parallel and
/// compares the per-epoch error of both runs.
#[derive(Debug, Parser)]
#[command(name = "ferrite-backprop", version, about)]
struct Cli {
    /// JSON run configuration; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// CSV dataset with one header line (built-in identity dataset if omitted).
    #[arg(long)]
    data: Option<PathBuf>,

    #[arg(long)]
    input_size: Option<usize>,

    #[arg(long)]
    hidden: Option<usize>,

    #[arg(long)]
    output_size: Option<usize>,

    #[arg(long)]
    epochs: Option<usize>,

    #[arg(long)]
    learning_rate: Option<f64>,

    /// Seed for weight initialization.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Parameter sharing of the parallel trainer.
    #[arg(long, value_enum)]
    sync: Option<SyncArg>,

    /// Worker threads of the parallel trainer.
    #[arg(long)]
    threads: Option<usize>,

    /// Directory for error logs, models and the chart.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Skip rendering the error chart.
    #[arg(long)]
    no_chart: bool,

    /// Open the chart and the error logs with the system viewers.
    #[arg(long)]
    open: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Sequential,
    Parallel,
    Both,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SyncArg {
    Wild,
    Locked,
}

impl Cli {
    fn into_run_config(self) -> Result<RunConfig> {
        let mut cfg = match &self.config {
            Some(path) => RunConfig::load_json(path)
                .with_context(|| format!("reading config {}", path.display()))?,
            None => RunConfig::default(),
        };

        if let Some(data) = self.data { cfg.data = Some(data); }
        if let Some(n) = self.input_size { cfg.input_size = n; }
        if let Some(n) = self.hidden { cfg.hidden_size = n; }
        if let Some(n) = self.output_size { cfg.output_size = n; }
        if let Some(n) = self.epochs { cfg.epochs = n; }
        if let Some(lr) = self.learning_rate { cfg.learning_rate = lr; }
        if let Some(seed) = self.seed { cfg.seed = Some(seed); }
        if let Some(n) = self.threads { cfg.threads = Some(n); }
        if let Some(dir) = self.out_dir { cfg.out_dir = dir; }
        if let Some(mode) = self.mode {
            cfg.mode = match mode {
                ModeArg::Sequential => RunMode::Sequential,
                ModeArg::Parallel   => RunMode::Parallel,
                ModeArg::Both       => RunMode::Both,
            };
        }
        if let Some(sync) = self.sync {
            cfg.sync = match sync {
                SyncArg::Wild   => ParamSync::Wild,
                SyncArg::Locked => ParamSync::Locked,
            };
        }
        if self.no_chart { cfg.chart = false; }
        if self.open { cfg.open_outputs = true; }

        cfg.validate()?;
        Ok(cfg)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg = Cli::parse().into_run_config()?;
    std::fs::create_dir_all(&cfg.out_dir)
        .with_context(|| format!("creating {}", cfg.out_dir.display()))?;

    let dataset = match &cfg.data {
        Some(path) => load_csv(path, cfg.input_size, cfg.output_size)?,
        None => {
            info!("no dataset given, using the built-in identity dataset");
            builtin_identity()
        }
    };

    let seed = cfg.seed.unwrap_or_else(rand::random);
    let initial = Network::seeded(dataset.input_size(), cfg.hidden_size, dataset.output_size(), seed)?;
    info!(
        "network {}x{}x{}, seed {seed}, {} samples, {} epochs, learning rate {}",
        dataset.input_size(),
        cfg.hidden_size,
        dataset.output_size(),
        dataset.len(),
        cfg.epochs,
        cfg.learning_rate
    );

    let mut runs: Vec<(ExecutionMode, ErrorSeries)> = Vec::new();
    for &mode in cfg.mode.modes() {
        let name = mode_name(mode);
        info!("running {name} training");

        let mut network = initial.clone();
        let started = Instant::now();
        let series = train_network(&mut network, &dataset, mode, &cfg.train_config(mode))?;
        info!("{name} training took {} ms", started.elapsed().as_millis());

        if let Some(last) = series.last() {
            info!("{name} final error: {}", last.mean_error);
        }
        let model_path = cfg.model_path(mode);
        network.save_json(&model_path)
            .with_context(|| format!("saving {}", model_path.display()))?;

        runs.push((mode, series));
    }

    if cfg.chart {
        let lines: Vec<ChartLine<'_>> = runs.iter()
            .map(|(mode, series)| ChartLine {
                label: mode_name(*mode),
                series,
                color: match mode {
                    ExecutionMode::Sequential => SEQUENTIAL_COLOR,
                    ExecutionMode::Parallel   => PARALLEL_COLOR,
                },
            })
            .collect();
        let chart_path = cfg.chart_path();
        render_error_chart(&lines, &chart_path)?;
        info!("chart saved to {}", chart_path.display());
    }

    for path in cfg.outputs_to_open() {
        if let Err(e) = open::that(&path) {
            warn!("could not open {}: {e}", path.display());
        }
    }

    Ok(())
}
