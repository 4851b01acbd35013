use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::math::{Matrix, WildMatrix};

/// Layer sizes of a single-hidden-layer network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dims {
    pub input: usize,
    pub hidden: usize,
    pub output: usize,
}

/// Names one of the four parameter tensors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tensor {
    /// `input × hidden` weights.
    InputHidden,
    /// `hidden × output` weights.
    HiddenOutput,
    /// `1 × hidden` biases.
    HiddenBias,
    /// `1 × output` biases.
    OutputBias,
}

/// Read and nudge access to a network's parameters.
///
/// The forward pass and the backpropagation step are written against this
/// trait once, and run unchanged over owned parameters, a mutex-guarded copy,
/// or the lock-free shared store used by the parallel trainer.
/// Bias tensors are addressed with `row == 0`.
pub trait ParamAccess {
    fn read(&self, tensor: Tensor, row: usize, col: usize) -> f64;
    fn nudge(&mut self, tensor: Tensor, row: usize, col: usize, delta: f64);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    pub w_ih: Matrix,
    pub w_ho: Matrix,
    pub b_h: Matrix,
    pub b_o: Matrix,
}

impl Parameters {
    /// Draws every entry from U[-1, 1): `w_ih`, then `w_ho`, then `b_h`, then `b_o`.
    pub fn random<R: Rng + ?Sized>(dims: Dims, rng: &mut R) -> Parameters {
        let w_ih = Matrix::random(dims.input, dims.hidden, rng);
        let w_ho = Matrix::random(dims.hidden, dims.output, rng);
        let b_h = Matrix::random(1, dims.hidden, rng);
        let b_o = Matrix::random(1, dims.output, rng);
        Parameters { w_ih, w_ho, b_h, b_o }
    }

    pub fn tensor(&self, tensor: Tensor) -> &Matrix {
        match tensor {
            Tensor::InputHidden  => &self.w_ih,
            Tensor::HiddenOutput => &self.w_ho,
            Tensor::HiddenBias   => &self.b_h,
            Tensor::OutputBias   => &self.b_o,
        }
    }

    fn tensor_mut(&mut self, tensor: Tensor) -> &mut Matrix {
        match tensor {
            Tensor::InputHidden  => &mut self.w_ih,
            Tensor::HiddenOutput => &mut self.w_ho,
            Tensor::HiddenBias   => &mut self.b_h,
            Tensor::OutputBias   => &mut self.b_o,
        }
    }

    /// True when every tensor has the shape `dims` implies.
    pub fn matches(&self, dims: Dims) -> bool {
        self.w_ih.has_shape(dims.input, dims.hidden)
            && self.w_ho.has_shape(dims.hidden, dims.output)
            && self.b_h.has_shape(1, dims.hidden)
            && self.b_o.has_shape(1, dims.output)
    }
}

impl ParamAccess for Parameters {
    #[inline]
    fn read(&self, tensor: Tensor, row: usize, col: usize) -> f64 {
        self.tensor(tensor).get(row, col)
    }

    #[inline]
    fn nudge(&mut self, tensor: Tensor, row: usize, col: usize, delta: f64) {
        self.tensor_mut(tensor).add_at(row, col, delta);
    }
}

/// Parameters shared between worker threads with no mutual exclusion.
///
/// See [`WildMatrix`] for what concurrent access may observe.
pub struct WildParameters {
    w_ih: WildMatrix,
    w_ho: WildMatrix,
    b_h: WildMatrix,
    b_o: WildMatrix,
}

impl WildParameters {
    pub fn from_parameters(params: &Parameters) -> WildParameters {
        WildParameters {
            w_ih: WildMatrix::from_matrix(&params.w_ih),
            w_ho: WildMatrix::from_matrix(&params.w_ho),
            b_h: WildMatrix::from_matrix(&params.b_h),
            b_o: WildMatrix::from_matrix(&params.b_o),
        }
    }

    pub fn to_parameters(&self) -> Parameters {
        Parameters {
            w_ih: self.w_ih.to_matrix(),
            w_ho: self.w_ho.to_matrix(),
            b_h: self.b_h.to_matrix(),
            b_o: self.b_o.to_matrix(),
        }
    }

    fn tensor(&self, tensor: Tensor) -> &WildMatrix {
        match tensor {
            Tensor::InputHidden  => &self.w_ih,
            Tensor::HiddenOutput => &self.w_ho,
            Tensor::HiddenBias   => &self.b_h,
            Tensor::OutputBias   => &self.b_o,
        }
    }
}

// Implemented on the shared reference: every worker holds its own `&WildParameters`
// and nudges through it concurrently.
impl ParamAccess for &WildParameters {
    #[inline]
    fn read(&self, tensor: Tensor, row: usize, col: usize) -> f64 {
        (**self).tensor(tensor).get(row, col)
    }

    #[inline]
    fn nudge(&mut self, tensor: Tensor, row: usize, col: usize, delta: f64) {
        (**self).tensor(tensor).add_at(row, col, delta);
    }
}
