//! Random initialization
//!
//! Normal draws via the Box–Muller transform over two uniform samples, and
//! matrices filled with them using a simplified Xavier scale.

use attnviz_core::Matrix;
use rand::Rng;
use std::f64::consts::PI;

/// One normal sample with the given mean and standard deviation
pub fn random_normal<R: Rng + ?Sized>(rng: &mut R, mean: f64, stddev: f64) -> f64 {
    // u1 in (0, 1] keeps ln(u1) finite
    let u1: f64 = 1.0 - rng.random::<f64>();
    let u2: f64 = rng.random::<f64>();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
    mean + stddev * z
}

/// Standard deviation used by [`random_matrix`] for a matrix with `cols` columns
pub fn init_stddev(cols: usize, scale: f64) -> f64 {
    if cols == 0 {
        return 0.0;
    }
    scale / (cols as f64).sqrt()
}

/// `rows x cols` matrix of independent draws from N(0, (scale / sqrt(cols))^2)
pub fn random_matrix<R: Rng + ?Sized>(rng: &mut R, rows: usize, cols: usize, scale: f64) -> Matrix {
    let stddev = init_stddev(cols, scale);
    log::trace!("random_matrix {}x{} stddev={:.4}", rows, cols, stddev);
    Matrix::from_fn(rows, cols, |_, _| random_normal(&mut *rng, 0.0, stddev))
}

/// Vector of `len` draws with the same scale rule as a 1-row matrix
pub fn random_vector<R: Rng + ?Sized>(rng: &mut R, len: usize, scale: f64) -> Vec<f64> {
    random_matrix(rng, 1, len, scale).into_vec()
}
