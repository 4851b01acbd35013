/// Logistic function, `1 / (1 + e^-x)`.
///
/// The exponent is always taken of a non-positive value, so the result
/// saturates to 0 or 1 for large-magnitude inputs instead of overflowing.
pub fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Derivative of the logistic function expressed in terms of its output.
///
/// `activated` must be a value already passed through [`sigmoid`], not the
/// pre-activation sum.
pub fn sigmoid_derivative(activated: f64) -> f64 {
    activated * (1.0 - activated)
}

/// Applies [`sigmoid`] element-wise.
pub fn sigmoid_in_place(values: &mut [f64]) {
    for v in values.iter_mut() {
        *v = sigmoid(*v);
    }
}
