use ferrite_backprop::data::builtin_xor;
use ferrite_backprop::{train_sequential, Network, TrainConfig};

fn main() -> ferrite_backprop::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let dataset = builtin_xor();
    let mut network = Network::seeded(2, 4, 2, 42)?;

    let series = train_sequential(&mut network, &dataset, &TrainConfig::new(10000, 0.5))?;
    if let Some(last) = series.last() {
        println!("Final error after {} epochs: {:.6}", series.len(), last.mean_error);
    }

    for sample in &dataset {
        let output = network.predict(&sample.input)?;
        println!("Input: {:?} -> Output: [{:.4}, {:.4}]", sample.input, output[0], output[1]);
    }
    Ok(())
}
