use std::path::Path;

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Serialize, Deserialize};

use crate::error::{NetError, Result};
use crate::network::params::{Dims, Parameters};
use crate::network::propagate::{backprop_step, forward_pass};

/// Fully connected network with one sigmoid hidden layer and a sigmoid output layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    dims: Dims,
    params: Parameters,
}

impl Network {
    /// Builds a network whose weights and biases are drawn from U[-1, 1) using `rng`.
    pub fn new<R: Rng + ?Sized>(
        input_size: usize,
        hidden_size: usize,
        output_size: usize,
        rng: &mut R,
    ) -> Result<Network> {
        let dims = Dims { input: input_size, hidden: hidden_size, output: output_size };
        check_dims(dims)?;
        let params = Parameters::random(dims, rng);
        Ok(Network { dims, params })
    }

    /// Same as [`Network::new`] with a `StdRng` seeded from `seed`.
    pub fn seeded(input_size: usize, hidden_size: usize, output_size: usize, seed: u64) -> Result<Network> {
        let mut rng = StdRng::seed_from_u64(seed);
        Network::new(input_size, hidden_size, output_size, &mut rng)
    }

    pub fn dims(&self) -> Dims {
        self.dims
    }

    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    pub(crate) fn replace_parameters(&mut self, params: Parameters) {
        debug_assert!(params.matches(self.dims));
        self.params = params;
    }

    /// Forward pass. Pure: the network is not modified.
    pub fn forward(&self, input: &[f64]) -> Result<Vec<f64>> {
        forward_pass(&self.params, self.dims, input).map(|acts| acts.output)
    }

    pub fn predict(&self, input: &[f64]) -> Result<Vec<f64>> {
        self.forward(input)
    }

    /// Runs one backpropagation step on a single sample and updates the
    /// parameters in place. Returns the sample's loss before the update.
    pub fn backpropagate_step(&mut self, input: &[f64], target: &[f64], learning_rate: f64) -> Result<f64> {
        backprop_step(&mut self.params, self.dims, input, target, learning_rate)
    }

    /// Serializes the network weights to a pretty-printed JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path.as_ref())?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a network from a JSON file previously written by `save_json`.
    /// Rejects files whose tensors disagree with the stored dimensions.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Network> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let network: Network = serde_json::from_reader(reader)?;

        check_dims(network.dims)?;
        let Dims { input, hidden, output } = network.dims;
        if !network.params.matches(network.dims) {
            return Err(NetError::Config(format!(
                "{}: parameter shapes do not match dimensions {input}x{hidden}x{output}",
                path.display()
            )));
        }
        Ok(network)
    }
}

fn check_dims(dims: Dims) -> Result<()> {
    for (name, value) in [
        ("input_size", dims.input),
        ("hidden_size", dims.hidden),
        ("output_size", dims.output),
    ] {
        if value == 0 {
            return Err(NetError::InvalidDimension { name, value });
        }
    }
    Ok(())
}
