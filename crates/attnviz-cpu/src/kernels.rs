/// Element-wise and row-wise kernels (scale, softmax, bias, activations)
use attnviz_core::error::{Error, Result};
use attnviz_core::{Matrix, Shape};

/// Multiply every entry by `s`
pub fn scale(a: &Matrix, s: f64) -> Matrix {
    map(a, |x| x * s)
}

/// Apply `f` to every entry
pub fn map(a: &Matrix, f: impl Fn(f64) -> f64) -> Matrix {
    let data = a.as_slice();
    let cols = a.cols();
    Matrix::from_fn(a.rows(), cols, |r, c| f(data[r * cols + c]))
}

/// ReLU activation: `max(0, x)`
pub fn relu(a: &Matrix) -> Matrix {
    map(a, |x| x.max(0.0))
}

/// Softmax over one row: `output[i] = exp(input[i] - max) / sum(exp(input - max))`
pub fn softmax_row(input: &[f64], output: &mut [f64]) {
    debug_assert_eq!(input.len(), output.len());

    // Find max for numerical stability
    let max = input.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let mut sum = 0.0;
    for (out, &x) in output.iter_mut().zip(input) {
        let exp_val = (x - max).exp();
        *out = exp_val;
        sum += exp_val;
    }

    for val in output.iter_mut() {
        *val /= sum;
    }
}

/// Row-wise softmax. Every non-empty output row sums to 1.
pub fn softmax(a: &Matrix) -> Matrix {
    let mut out = a.as_slice().to_vec();
    let cols = a.cols();
    if cols > 0 {
        for (input, output) in a.as_slice().chunks_exact(cols).zip(out.chunks_exact_mut(cols)) {
            softmax_row(input, output);
        }
    }
    Matrix::from_fn(a.rows(), cols, |r, c| out[r * cols + c])
}

/// Broadcast-add `bias` to every row of `a`
pub fn add_bias(a: &Matrix, bias: &[f64]) -> Result<Matrix> {
    if a.cols() != bias.len() {
        return Err(Error::mismatch("add_bias", a.shape(), Shape::new(1, bias.len())));
    }
    let data = a.as_slice();
    let cols = a.cols();
    Ok(Matrix::from_fn(a.rows(), cols, |r, c| data[r * cols + c] + bias[c]))
}

/// Element-wise sum of two matrices of identical shape
pub fn elementwise_add(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    if a.shape() != b.shape() {
        return Err(Error::mismatch("elementwise_add", a.shape(), b.shape()));
    }
    let sum = a.as_slice().iter().zip(b.as_slice()).map(|(x, y)| x + y).collect();
    Matrix::from_vec(a.rows(), a.cols(), sum)
}
