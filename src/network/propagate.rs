use crate::activation::{sigmoid_derivative, sigmoid_in_place};
use crate::error::{NetError, Result};
use crate::loss::MseLoss;
use crate::network::params::{Dims, ParamAccess, Tensor};

/// Activations of one forward pass. Never cached between calls.
#[derive(Debug, Clone)]
pub struct Activations {
    pub hidden: Vec<f64>,
    pub output: Vec<f64>,
}

fn check_len(what: &'static str, expected: usize, received: usize) -> Result<()> {
    if expected != received {
        return Err(NetError::mismatch(what, expected, received));
    }
    Ok(())
}

/// `hidden = σ(b_h + input · W_ih)`, `output = σ(b_o + hidden · W_ho)`.
pub fn forward_pass<P: ParamAccess>(params: &P, dims: Dims, input: &[f64]) -> Result<Activations> {
    check_len("input", dims.input, input.len())?;

    let mut hidden = vec![0.0; dims.hidden];
    for (h, unit) in hidden.iter_mut().enumerate() {
        *unit = params.read(Tensor::HiddenBias, 0, h);
        for (i, x) in input.iter().enumerate() {
            *unit += x * params.read(Tensor::InputHidden, i, h);
        }
    }
    sigmoid_in_place(&mut hidden);

    let mut output = vec![0.0; dims.output];
    for (o, unit) in output.iter_mut().enumerate() {
        *unit = params.read(Tensor::OutputBias, 0, o);
        for (h, a) in hidden.iter().enumerate() {
            *unit += a * params.read(Tensor::HiddenOutput, h, o);
        }
    }
    sigmoid_in_place(&mut output);

    Ok(Activations { hidden, output })
}

/// One forward pass, gradient computation and in-place update for a single sample.
///
/// Returns the sample's mean squared error measured before the update.
/// Both vectors are validated before anything is read or written, so a
/// mismatch leaves `params` untouched.
pub fn backprop_step<P: ParamAccess>(
    params: &mut P,
    dims: Dims,
    input: &[f64],
    target: &[f64],
    learning_rate: f64,
) -> Result<f64> {
    check_len("input", dims.input, input.len())?;
    check_len("target", dims.output, target.len())?;

    let Activations { hidden, output } = forward_pass(&*params, dims, input)?;

    let output_errors = MseLoss::errors(&output, target);
    let output_deltas: Vec<f64> = output_errors.iter().zip(output.iter())
        .map(|(e, a)| e * sigmoid_derivative(*a))
        .collect();
    let loss = MseLoss::loss(&output, target);

    // Hidden error is propagated through W_ho as it was before this step.
    let hidden_deltas: Vec<f64> = hidden.iter().enumerate()
        .map(|(h, a)| {
            let error: f64 = output_deltas.iter().enumerate()
                .map(|(o, d)| d * params.read(Tensor::HiddenOutput, h, o))
                .sum();
            error * sigmoid_derivative(*a)
        })
        .collect();

    for (h, a) in hidden.iter().enumerate() {
        for (o, d) in output_deltas.iter().enumerate() {
            params.nudge(Tensor::HiddenOutput, h, o, learning_rate * d * a);
        }
    }
    for (o, d) in output_deltas.iter().enumerate() {
        params.nudge(Tensor::OutputBias, 0, o, learning_rate * d);
    }
    for (i, x) in input.iter().enumerate() {
        for (h, d) in hidden_deltas.iter().enumerate() {
            params.nudge(Tensor::InputHidden, i, h, learning_rate * d * x);
        }
    }
    for (h, d) in hidden_deltas.iter().enumerate() {
        params.nudge(Tensor::HiddenBias, 0, h, learning_rate * d);
    }

    Ok(loss)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Matrix;
    use crate::network::params::Parameters;
    use approx::assert_relative_eq;

    const DIMS: Dims = Dims { input: 1, hidden: 1, output: 1 };

    fn zero_params() -> Parameters {
        Parameters {
            w_ih: Matrix::zeros(1, 1),
            w_ho: Matrix::zeros(1, 1),
            b_h: Matrix::zeros(1, 1),
            b_o: Matrix::zeros(1, 1),
        }
    }

    #[test]
    fn zero_parameters_give_one_half_everywhere() {
        let acts = forward_pass(&zero_params(), DIMS, &[3.0]).unwrap();
        assert_relative_eq!(acts.hidden[0], 0.5);
        assert_relative_eq!(acts.output[0], 0.5);
    }

    #[test]
    fn hand_computed_step_matches() {
        // All parameters zero, input 1, target 1, lr 1.
        // output = 0.5, error = 0.5, delta_o = 0.5 * 0.25 = 0.125.
        // hidden = 0.5, hidden error = 0.125 * w_ho(0) = 0 → delta_h = 0.
        let mut params = zero_params();
        let loss = backprop_step(&mut params, DIMS, &[1.0], &[1.0], 1.0).unwrap();

        assert_relative_eq!(loss, 0.25);
        assert_relative_eq!(params.w_ho.get(0, 0), 0.125 * 0.5);
        assert_relative_eq!(params.b_o.get(0, 0), 0.125);
        assert_relative_eq!(params.w_ih.get(0, 0), 0.0);
        assert_relative_eq!(params.b_h.get(0, 0), 0.0);
    }

    #[test]
    fn hidden_error_uses_pre_update_output_weights() {
        let mut params = zero_params();
        params.w_ho.data[0][0] = 2.0;
        // hidden = 0.5, output = σ(1.0)
        let out = crate::activation::sigmoid(1.0);
        let delta_o = (1.0 - out) * out * (1.0 - out);
        let delta_h = delta_o * 2.0 * 0.25;

        backprop_step(&mut params, DIMS, &[1.0], &[1.0], 0.1).unwrap();

        assert_relative_eq!(params.w_ho.get(0, 0), 2.0 + 0.1 * delta_o * 0.5, epsilon = 1e-12);
        assert_relative_eq!(params.w_ih.get(0, 0), 0.1 * delta_h, epsilon = 1e-12);
        assert_relative_eq!(params.b_h.get(0, 0), 0.1 * delta_h, epsilon = 1e-12);
    }

    #[test]
    fn mismatched_target_is_rejected_before_any_write() {
        let mut params = zero_params();
        let err = backprop_step(&mut params, DIMS, &[1.0], &[1.0, 0.0], 0.5).unwrap_err();
        assert!(matches!(
            err,
            NetError::DimensionMismatch { what: "target", expected: 1, received: 2 }
        ));
        assert_eq!(params, zero_params());
    }
}
